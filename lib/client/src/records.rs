//! Model-agnostic CRUD surface consumed by every entity service.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use campus_core::{CreatedRecord, Domain, OperationError, RecordQuery, RecordSet};

use crate::transport::Transport;

pub struct RecordApi {
    transport: Arc<Transport>,
}

impl RecordApi {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Query a model. An empty field list requests all fields; other
    /// defaults per [`RecordQuery`].
    pub async fn search_read<T: DeserializeOwned>(
        &self,
        model: &str,
        query: &RecordQuery,
    ) -> Result<RecordSet<T>, OperationError> {
        let raw = self.transport.search_read(model, query).await?;
        let mut records = Vec::with_capacity(raw.records.len());
        for value in raw.records {
            records.push(serde_json::from_value(value).map_err(|e| {
                OperationError::remote(400, format!("{} record decode failed: {}", model, e), None)
            })?);
        }
        Ok(RecordSet {
            records,
            total: raw.total,
        })
    }

    /// Create one record. Only the assigned id comes back — re-fetch if
    /// the full record is needed.
    pub async fn create(
        &self,
        model: &str,
        values: Value,
    ) -> Result<CreatedRecord, OperationError> {
        let result = self
            .transport
            .call_kw(model, "create", json!([values]), json!({}))
            .await?;
        let id = result
            .as_i64()
            .ok_or_else(|| OperationError::remote(400, "create returned no id", None))?;
        Ok(CreatedRecord { id })
    }

    /// Partial write: only the supplied fields change, everything else
    /// keeps its server-side value.
    pub async fn update(
        &self,
        model: &str,
        id: i64,
        values: Value,
    ) -> Result<bool, OperationError> {
        let result = self
            .transport
            .call_kw(model, "write", json!([[id], values]), json!({}))
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub async fn delete(&self, model: &str, id: i64) -> Result<bool, OperationError> {
        let result = self
            .transport
            .call_kw(model, "unlink", json!([[id]]), json!({}))
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    /// Fetch one record by id. A miss is `Ok(None)` — a missing record is
    /// a normal outcome, not a failure.
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        model: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<T>, OperationError> {
        let query = RecordQuery::new()
            .domain(Domain::new().filter("id", "=", id))
            .fields(fields.iter().copied())
            .limit(1);
        let mut set = self.search_read::<T>(model, &query).await?;
        if set.records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(set.records.remove(0)))
        }
    }
}
