//! Student records — individual, customer-flagged partners.

use std::sync::Arc;

use serde_json::{Map, Value};

use campus_core::{CreatedRecord, Domain, OperationError, RecordQuery, RecordSet, query::clause};

use crate::config::{BackendCapabilities, fields};
use crate::model::{Student, StudentForm, StudentUpdate};
use crate::records::RecordApi;

const MODEL: &str = "res.partner";
const SEARCH_LIMIT: u32 = 20;

pub struct StudentService {
    api: Arc<RecordApi>,
    capabilities: BackendCapabilities,
}

impl StudentService {
    pub fn new(api: Arc<RecordApi>, capabilities: BackendCapabilities) -> Self {
        Self { api, capabilities }
    }

    fn base_domain(&self) -> Domain {
        let domain = Domain::new().filter("is_company", "=", false);
        if self.capabilities.rank_fields {
            domain.filter("customer_rank", ">", 0)
        } else {
            domain
        }
    }

    fn projection() -> Vec<&'static str> {
        let mut projection = fields::BASE.to_vec();
        projection.extend_from_slice(fields::STUDENT);
        projection
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Student>, OperationError> {
        let query = RecordQuery::new()
            .domain(self.base_domain())
            .fields(Self::projection())
            .limit(limit)
            .offset(offset)
            .order("name asc");
        let mut set = self.api.search_read::<Student>(MODEL, &query).await?;
        for student in &mut set.records {
            student.decode_extra();
        }
        Ok(set)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Student>, OperationError> {
        let mut student = self
            .api
            .get_by_id::<Student>(MODEL, id, &Self::projection())
            .await?;
        if let Some(student) = student.as_mut() {
            student.decode_extra();
        }
        Ok(student)
    }

    /// Create a student. Attributes without backend columns are packed
    /// into the comment annotation; the guardian phone is mirrored into
    /// `mobile` so it stays reachable from stock partner views.
    pub async fn create(&self, form: &StudentForm) -> Result<CreatedRecord, OperationError> {
        if form.name.trim().is_empty() {
            return Err(OperationError::BadRequest("student name is required".into()));
        }

        let mut extra = form.extra.clone();
        let mut values = Map::new();
        values.insert("name".into(), form.name.clone().into());
        values.insert("is_company".into(), false.into());
        if self.capabilities.rank_fields {
            values.insert("customer_rank".into(), 1.into());
        }
        if let Some(email) = form.email.as_deref() {
            values.insert("email".into(), email.into());
        }
        if let Some(phone) = form.phone.as_deref() {
            values.insert("phone".into(), phone.into());
        }
        if let Some(address) = form.address.as_deref() {
            values.insert("street".into(), address.into());
        }
        if let Some(guardian_phone) = extra.guardian_phone.as_deref() {
            values.insert("mobile".into(), guardian_phone.into());
        }
        if self.capabilities.student_ref_field {
            if let Some(student_id) = extra.student_id.take() {
                values.insert("ref".into(), student_id.into());
            }
        }

        let comment = extra.pack().unwrap_or_else(|| {
            format!(
                "Student enrolled on {}",
                chrono::Utc::now().format("%Y-%m-%d")
            )
        });
        values.insert("comment".into(), comment.into());

        self.api.create(MODEL, Value::Object(values)).await
    }

    /// Narrow patch: only name/email/phone and the student id have a safe
    /// write path; the remaining annotation-packed attributes do not.
    pub async fn update(&self, id: i64, patch: &StudentUpdate) -> Result<bool, OperationError> {
        let mut values = Map::new();
        if let Some(name) = patch.name.as_deref() {
            values.insert("name".into(), name.into());
        }
        if let Some(email) = patch.email.as_deref() {
            values.insert("email".into(), email.into());
        }
        if let Some(phone) = patch.phone.as_deref() {
            values.insert("phone".into(), phone.into());
        }
        if let Some(student_id) = patch.student_id.as_deref() {
            if self.capabilities.student_ref_field {
                values.insert("ref".into(), student_id.into());
            } else {
                values.insert("comment".into(), format!("Student ID: {}", student_id).into());
            }
        }
        if values.is_empty() {
            return Ok(true);
        }
        self.api.update(MODEL, id, Value::Object(values)).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        self.api.delete(MODEL, id).await
    }

    /// Free-text lookup over name, email, and phone.
    pub async fn search(&self, term: &str) -> Result<RecordSet<Student>, OperationError> {
        let domain = self.base_domain().any_of(vec![
            clause("name", "ilike", term),
            clause("email", "ilike", term),
            clause("phone", "ilike", term),
        ]);
        let query = RecordQuery::new()
            .domain(domain)
            .fields(Self::projection())
            .limit(SEARCH_LIMIT);
        let mut set = self.api.search_read::<Student>(MODEL, &query).await?;
        for student in &mut set.records {
            student.decode_extra();
        }
        Ok(set)
    }
}
