//! Enrollments linking students to courses within an academic year.

use std::sync::Arc;

use serde_json::json;

use campus_core::{CreatedRecord, DEFAULT_LIMIT, OperationError, RecordSet};

use crate::model::Enrollment;
use crate::records::RecordApi;
use crate::repository::{FixtureRepository, RecordRepository, RemoteRepository};

use super::fixtures;

pub struct EnrollmentService {
    repo: Arc<dyn RecordRepository<Enrollment>>,
}

impl EnrollmentService {
    pub fn new(repo: Arc<dyn RecordRepository<Enrollment>>) -> Self {
        Self { repo }
    }

    pub fn fixture() -> Self {
        Self::new(Arc::new(FixtureRepository::seeded(fixtures::enrollments())))
    }

    pub fn remote(api: Arc<RecordApi>, model: impl Into<String>) -> Self {
        Self::new(Arc::new(
            RemoteRepository::new(api, model).order("enrollment_date desc"),
        ))
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Enrollment>, OperationError> {
        self.repo.list(limit, offset).await
    }

    /// Enrollments for one student.
    pub async fn get_by_student(
        &self,
        student_id: i64,
    ) -> Result<RecordSet<Enrollment>, OperationError> {
        let set = self.repo.list(DEFAULT_LIMIT, 0).await?;
        let records: Vec<Enrollment> = set
            .records
            .into_iter()
            .filter(|e| e.student_id.as_ref().is_some_and(|(id, _)| *id == student_id))
            .collect();
        let total = records.len() as u64;
        Ok(RecordSet { records, total })
    }

    /// Enroll a student into a course for the given year. Reference names
    /// are resolved by the backing store on read.
    pub async fn enroll(
        &self,
        student_id: i64,
        course_id: i64,
        academic_year_id: i64,
    ) -> Result<CreatedRecord, OperationError> {
        self.repo
            .create(json!({
                "student_id": [student_id, ""],
                "course_id": [course_id, ""],
                "academic_year_id": [academic_year_id, ""],
                "enrollment_date": chrono::Utc::now().format("%Y-%m-%d").to_string(),
                "status": "enrolled",
                "credits_earned": 0,
            }))
            .await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<bool, OperationError> {
        self.repo.update(id, json!({"status": status})).await
    }
}
