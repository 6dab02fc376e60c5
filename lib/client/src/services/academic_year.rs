//! Academic years.
//!
//! Exactly one year may be current at a time; writes that set
//! `is_current` clear the flag on whichever year held it before.

use std::sync::Arc;

use serde_json::{Value, json};

use campus_core::{CreatedRecord, DEFAULT_LIMIT, OperationError, RecordSet};

use crate::model::AcademicYear;
use crate::records::RecordApi;
use crate::repository::{FixtureRepository, RecordRepository, RemoteRepository};

use super::fixtures;

pub struct AcademicYearService {
    repo: Arc<dyn RecordRepository<AcademicYear>>,
}

impl AcademicYearService {
    pub fn new(repo: Arc<dyn RecordRepository<AcademicYear>>) -> Self {
        Self { repo }
    }

    pub fn fixture() -> Self {
        Self::new(Arc::new(FixtureRepository::seeded(
            fixtures::academic_years(),
        )))
    }

    pub fn remote(api: Arc<RecordApi>, model: impl Into<String>) -> Self {
        Self::new(Arc::new(
            RemoteRepository::new(api, model).order("start_date desc"),
        ))
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<AcademicYear>, OperationError> {
        self.repo.list(limit, offset).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<AcademicYear>, OperationError> {
        self.repo.get(id).await
    }

    /// The year flagged current, if any.
    pub async fn get_current(&self) -> Result<Option<AcademicYear>, OperationError> {
        let set = self.repo.list(DEFAULT_LIMIT, 0).await?;
        Ok(set.records.into_iter().find(|year| year.is_current))
    }

    pub async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError> {
        if values["is_current"].as_bool() == Some(true) {
            self.clear_current().await?;
        }
        self.repo.create(values).await
    }

    pub async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError> {
        if values["is_current"].as_bool() == Some(true) {
            self.clear_current().await?;
        }
        self.repo.update(id, values).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        self.repo.delete(id).await
    }

    async fn clear_current(&self) -> Result<(), OperationError> {
        let set = self.repo.list(DEFAULT_LIMIT, 0).await?;
        for year in set.records.into_iter().filter(|year| year.is_current) {
            self.repo
                .update(year.id, json!({"is_current": false}))
                .await?;
        }
        Ok(())
    }
}
