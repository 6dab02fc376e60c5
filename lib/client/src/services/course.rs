//! Course catalog.
//!
//! The backend has no course model yet, so the default construction runs
//! on seeded fixture rows; `remote()` exists so callers can repoint the
//! service at a real model without changing a single call site.

use std::sync::Arc;

use serde_json::Value;

use campus_core::{CreatedRecord, OperationError, RecordSet};

use crate::model::Course;
use crate::records::RecordApi;
use crate::repository::{FixtureRepository, RecordRepository, RemoteRepository};

use super::fixtures;

pub struct CourseService {
    repo: Arc<dyn RecordRepository<Course>>,
}

impl CourseService {
    pub fn new(repo: Arc<dyn RecordRepository<Course>>) -> Self {
        Self { repo }
    }

    /// Demo-mode service over the seeded catalog.
    pub fn fixture() -> Self {
        Self::new(Arc::new(FixtureRepository::seeded(fixtures::courses())))
    }

    /// Remote-backed service for a backend that has grown a course model.
    pub fn remote(api: Arc<RecordApi>, model: impl Into<String>) -> Self {
        Self::new(Arc::new(
            RemoteRepository::new(api, model).order("name asc"),
        ))
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Course>, OperationError> {
        self.repo.list(limit, offset).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Course>, OperationError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError> {
        self.repo.create(values).await
    }

    pub async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError> {
        self.repo.update(id, values).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        self.repo.delete(id).await
    }
}
