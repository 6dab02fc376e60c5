//! Backend connection configuration.
//!
//! Everything environment-specific lives here: where the backend is, which
//! database to authenticate against, which RPC dialect it speaks, and which
//! schema capabilities it has. Logic never hard-codes any of it.

use std::time::Duration;

use campus_core::OperationError;

/// Endpoint paths, per dialect.
pub mod endpoints {
    pub const SESSION_AUTHENTICATE: &str = "/web/session/authenticate";
    pub const SESSION_DESTROY: &str = "/web/session/destroy";
    pub const SESSION_VERSION: &str = "/web/webclient/version_info";
    pub const DATASET_SEARCH_READ: &str = "/web/dataset/search_read";
    pub const DATASET_CALL_KW: &str = "/web/dataset/call_kw";
    pub const JSONRPC: &str = "/jsonrpc";
}

/// Field projections shared by the entity services.
pub mod fields {
    pub const BASE: &[&str] = &["id", "display_name", "create_date", "write_date"];
    pub const PARTNER: &[&str] = &[
        "name", "email", "phone", "mobile", "is_company", "active", "comment",
    ];
    pub const PARTNER_DETAIL: &[&str] = &["street", "city", "vat"];
    pub const STUDENT: &[&str] = &[
        "name", "email", "phone", "mobile", "street", "city", "comment", "active", "ref",
    ];
}

/// Which JSON-RPC dialect the backend speaks.
///
/// `Session` is the web client's endpoint family, authenticated by a
/// session cookie. `Service` is the older `/jsonrpc` service/method/args
/// family, where there is no session token and every object call carries
/// the uid plus an execution credential instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RpcDialect {
    #[default]
    Session,
    Service,
}

/// Feature switches for backend schema differences.
#[derive(Debug, Clone, Copy)]
pub struct BackendCapabilities {
    /// Backend has `customer_rank`/`supplier_rank` partner columns. When
    /// false, partner-role domains fall back to `is_company` alone.
    pub rank_fields: bool,

    /// Student id lives in the partner `ref` column. When false, it rides
    /// in the comment annotation instead.
    pub student_ref_field: bool,
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self {
            rank_fields: true,
            student_ref_field: false,
        }
    }
}

/// Connection settings for one backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8069`.
    pub base_url: String,

    /// Database name passed to authentication.
    pub database: String,

    /// Per-call network timeout. A call past this is ServiceUnavailable.
    pub timeout: Duration,

    pub dialect: RpcDialect,
    pub capabilities: BackendCapabilities,

    /// Pre-provisioned API key for Service-dialect object calls. When
    /// unset, the password captured at login is used instead.
    pub service_credential: Option<String>,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            database: database.into(),
            timeout: DEFAULT_TIMEOUT,
            dialect: RpcDialect::default(),
            capabilities: BackendCapabilities::default(),
            service_credential: None,
        }
    }

    pub fn dialect(mut self, dialect: RpcDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capabilities(mut self, capabilities: BackendCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn service_credential(mut self, credential: impl Into<String>) -> Self {
        self.service_credential = Some(credential.into());
        self
    }

    /// Read connection settings from the environment:
    /// `CAMPUS_ODOO_URL`, `CAMPUS_ODOO_DB`, `CAMPUS_ODOO_DIALECT`
    /// (`session` or `service`), `CAMPUS_ODOO_API_KEY`.
    pub fn from_env() -> Result<Self, OperationError> {
        let base_url = std::env::var("CAMPUS_ODOO_URL")
            .map_err(|_| OperationError::BadRequest("CAMPUS_ODOO_URL is not set".into()))?;
        let database = std::env::var("CAMPUS_ODOO_DB")
            .map_err(|_| OperationError::BadRequest("CAMPUS_ODOO_DB is not set".into()))?;

        let mut config = Self::new(base_url, database);
        if let Ok(dialect) = std::env::var("CAMPUS_ODOO_DIALECT") {
            config.dialect = match dialect.as_str() {
                "service" | "jsonrpc" => RpcDialect::Service,
                _ => RpcDialect::Session,
            };
        }
        if let Ok(key) = std::env::var("CAMPUS_ODOO_API_KEY") {
            if !key.is_empty() {
                config.service_credential = Some(key);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = BackendConfig::new("http://erp.local:8069/", "school");
        assert_eq!(config.base_url, "http://erp.local:8069");
        assert_eq!(config.database, "school");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.dialect, RpcDialect::Session);
    }

    #[test]
    fn builder_setters() {
        let config = BackendConfig::new("http://erp.local", "school")
            .dialect(RpcDialect::Service)
            .timeout(Duration::from_secs(3))
            .service_credential("api-key-1");
        assert_eq!(config.dialect, RpcDialect::Service);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.service_credential.as_deref(), Some("api-key-1"));
    }
}
