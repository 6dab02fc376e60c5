//! Pluggable record backing stores.
//!
//! Entities whose remote models don't exist yet run on seeded fixture
//! data; the rest run against the backend. Both sit behind one capability
//! interface so callers never know which they got, and a fixture-backed
//! service can be repointed at a real model without touching its API.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use campus_core::{CreatedRecord, Domain, OperationError, RecordQuery, RecordSet};

use crate::records::RecordApi;

#[async_trait]
pub trait RecordRepository<T>: Send + Sync {
    async fn list(&self, limit: u32, offset: u32) -> Result<RecordSet<T>, OperationError>;
    async fn get(&self, id: i64) -> Result<Option<T>, OperationError>;
    async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError>;
    async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError>;
    async fn delete(&self, id: i64) -> Result<bool, OperationError>;
}

// ── FixtureRepository ───────────────────────────────────────────────

/// In-memory repository over seeded rows.
///
/// Rows are stored as raw JSON objects and typed on the way out, the same
/// direction the wire takes; ids are assigned past the highest seeded id.
pub struct FixtureRepository<T> {
    rows: RwLock<Vec<Value>>,
    next_id: AtomicI64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FixtureRepository<T> {
    /// Seed with initial rows. Each row must be an object carrying a
    /// unique numeric `id`.
    pub fn seeded(rows: Vec<Value>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|row| row["id"].as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            rows: RwLock::new(rows),
            next_id: AtomicI64::new(next_id),
            _marker: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self::seeded(Vec::new())
    }

    fn read_rows(&self) -> Vec<Value> {
        self.rows.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn decode(row: &Value) -> Result<T, OperationError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(row.clone())
            .map_err(|e| OperationError::remote(400, format!("fixture decode failed: {}", e), None))
    }
}

/// Shallow JSON merge: null removes a key, anything else replaces it.
fn merge(base: &mut Value, patch: &Value) {
    let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch_obj {
        if value.is_null() {
            base_obj.remove(key);
        } else {
            base_obj.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl<T> RecordRepository<T> for FixtureRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    async fn list(&self, limit: u32, offset: u32) -> Result<RecordSet<T>, OperationError> {
        let rows = self.read_rows();
        let total = rows.len() as u64;
        let records = rows
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(Self::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecordSet { records, total })
    }

    async fn get(&self, id: i64) -> Result<Option<T>, OperationError> {
        let rows = self.read_rows();
        rows.iter()
            .find(|row| row["id"].as_i64() == Some(id))
            .map(Self::decode)
            .transpose()
    }

    async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError> {
        if !values.is_object() {
            return Err(OperationError::BadRequest(
                "record values must be an object".into(),
            ));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut row = values;
        row["id"] = id.into();
        self.rows
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(row);
        Ok(CreatedRecord { id })
    }

    async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError> {
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        let Some(row) = rows.iter_mut().find(|row| row["id"].as_i64() == Some(id)) else {
            return Ok(false);
        };
        merge(row, &values);
        row["id"] = id.into();
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        let before = rows.len();
        rows.retain(|row| row["id"].as_i64() != Some(id));
        Ok(rows.len() < before)
    }
}

// ── RemoteRepository ────────────────────────────────────────────────

/// Repository that fixes a model, projection, and domain over the generic
/// record API.
pub struct RemoteRepository<T> {
    api: Arc<RecordApi>,
    model: String,
    fields: Vec<String>,
    domain: Domain,
    order: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RemoteRepository<T> {
    pub fn new(api: Arc<RecordApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
            fields: Vec::new(),
            domain: Domain::new(),
            order: String::new(),
            _marker: PhantomData,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn order(mut self, order: &str) -> Self {
        self.order = order.to_string();
        self
    }
}

#[async_trait]
impl<T> RecordRepository<T> for RemoteRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    async fn list(&self, limit: u32, offset: u32) -> Result<RecordSet<T>, OperationError> {
        let query = RecordQuery::new()
            .domain(self.domain.clone())
            .fields(self.fields.iter().cloned())
            .limit(limit)
            .offset(offset)
            .order(&self.order);
        self.api.search_read(&self.model, &query).await
    }

    async fn get(&self, id: i64) -> Result<Option<T>, OperationError> {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        self.api.get_by_id(&self.model, id, &fields).await
    }

    async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError> {
        self.api.create(&self.model, values).await
    }

    async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError> {
        self.api.update(&self.model, id, values).await
    }

    async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        self.api.delete(&self.model, id).await
    }
}
