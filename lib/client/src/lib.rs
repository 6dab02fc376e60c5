//! Client stack for an Odoo-style ERP backend.
//!
//! Wire shape in, typed records out: a [`Transport`] speaks the backend's
//! JSON-RPC dialects and classifies every outcome into one error taxonomy,
//! a [`SessionStore`] owns the login state and its durable snapshot, a
//! [`RecordApi`] gives model-agnostic CRUD, and the entity services fix
//! per-entity models, projections, and domains on top.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use campus_client::{BackendConfig, Client};
//!
//! let config = BackendConfig::new("http://localhost:8069", "school");
//! let kv = Arc::new(campus_kv::RedbStore::open(path)?);
//! let client = Client::new(config, kv);
//!
//! client.login("ana", "s3cret").await?;
//! let students = client.students.get_all(50, 0).await?;
//! ```

pub mod config;
mod de;
pub mod envelope;
pub mod model;
pub mod records;
pub mod repository;
pub mod services;
pub mod session;
pub mod transport;

use std::sync::Arc;

use campus_core::OperationError;
use campus_kv::KVStore;

pub use campus_core::{
    CreatedRecord, DEFAULT_LIMIT, Domain, DomainTerm, RecordQuery, RecordSet, StudentExtra, clause,
};
pub use config::{BackendCapabilities, BackendConfig, RpcDialect};
pub use model::{AcademicYear, Course, Enrollment, Partner, Student, StudentForm, StudentUpdate};
pub use records::RecordApi;
pub use repository::{FixtureRepository, RecordRepository, RemoteRepository};
pub use services::{
    AcademicYearService, CourseService, EnrollmentService, PartnerService, StudentService,
};
pub use session::{Session, SessionStore};
pub use transport::Transport;

/// Composition root: session store, transport, record API, and the entity
/// services wired over one backend.
///
/// Courses, academic years, and enrollments run on fixture repositories —
/// the backend has no matching models yet. Swap them via the service
/// constructors when it grows some.
pub struct Client {
    session: Arc<SessionStore>,
    transport: Arc<Transport>,
    api: Arc<RecordApi>,

    pub students: StudentService,
    pub partners: PartnerService,
    pub courses: CourseService,
    pub academic_years: AcademicYearService,
    pub enrollments: EnrollmentService,
}

impl Client {
    pub fn new(config: BackendConfig, kv: Arc<dyn KVStore>) -> Self {
        let capabilities = config.capabilities;
        let session = Arc::new(SessionStore::new(kv));
        let transport = Arc::new(Transport::new(config, Arc::clone(&session)));
        let api = Arc::new(RecordApi::new(Arc::clone(&transport)));
        Self {
            students: StudentService::new(Arc::clone(&api), capabilities),
            partners: PartnerService::new(Arc::clone(&api), capabilities),
            courses: CourseService::fixture(),
            academic_years: AcademicYearService::fixture(),
            enrollments: EnrollmentService::fixture(),
            session,
            transport,
            api,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn records(&self) -> &Arc<RecordApi> {
        &self.api
    }

    /// Authenticate and install the session. Empty credentials are refused
    /// before any network I/O; a failed attempt leaves any previous
    /// session untouched.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, OperationError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(OperationError::BadRequest(
                "username and password are required".into(),
            ));
        }
        let session = self.transport.authenticate(username, password).await?;
        tracing::info!("logged in as {} (uid {})", session.username, session.user_id);
        self.session.store(session.clone());
        Ok(session)
    }

    /// Log out. The remote teardown is best-effort — a failure is logged
    /// and swallowed — but local state is always cleared, so the caller
    /// ends up unauthenticated no matter what. Safe to call twice.
    pub async fn logout(&self) {
        if self.session.check_auth() {
            if let Err(e) = self.transport.destroy_session().await {
                tracing::warn!("remote session teardown failed: {}", e);
            }
        }
        self.session.clear();
    }

    /// True when a session is live, restoring once from the durable
    /// snapshot if needed.
    pub fn check_auth(&self) -> bool {
        self.session.check_auth()
    }
}
