//! Partner records, read through the customer/supplier lenses.
//!
//! The two read paths differ only in their domain filter. Backends with
//! rank columns distinguish roles by `customer_rank`/`supplier_rank`;
//! older schemas fall back to the company flag.

use std::sync::Arc;

use serde_json::Value;

use campus_core::{CreatedRecord, Domain, OperationError, RecordQuery, RecordSet};

use crate::config::{BackendCapabilities, fields};
use crate::model::Partner;
use crate::records::RecordApi;

const MODEL: &str = "res.partner";

pub struct PartnerService {
    api: Arc<RecordApi>,
    capabilities: BackendCapabilities,
}

impl PartnerService {
    pub fn new(api: Arc<RecordApi>, capabilities: BackendCapabilities) -> Self {
        Self { api, capabilities }
    }

    fn customers_domain(&self) -> Domain {
        if self.capabilities.rank_fields {
            Domain::new().filter("customer_rank", ">", 0)
        } else {
            Domain::new().filter("is_company", "=", false)
        }
    }

    fn suppliers_domain(&self) -> Domain {
        if self.capabilities.rank_fields {
            Domain::new().filter("supplier_rank", ">", 0)
        } else {
            Domain::new().filter("is_company", "=", true)
        }
    }

    fn projection() -> Vec<&'static str> {
        let mut projection = fields::BASE.to_vec();
        projection.extend_from_slice(fields::PARTNER);
        projection
    }

    async fn list(
        &self,
        domain: Domain,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Partner>, OperationError> {
        let query = RecordQuery::new()
            .domain(domain)
            .fields(Self::projection())
            .limit(limit)
            .offset(offset)
            .order("name asc");
        self.api.search_read(MODEL, &query).await
    }

    pub async fn get_customers(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Partner>, OperationError> {
        self.list(self.customers_domain(), limit, offset).await
    }

    pub async fn get_suppliers(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<RecordSet<Partner>, OperationError> {
        self.list(self.suppliers_domain(), limit, offset).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Partner>, OperationError> {
        let mut projection = Self::projection();
        projection.extend_from_slice(fields::PARTNER_DETAIL);
        self.api.get_by_id(MODEL, id, &projection).await
    }

    /// Create from a partial field map; the backend fills the rest.
    pub async fn create(&self, values: Value) -> Result<CreatedRecord, OperationError> {
        self.api.create(MODEL, values).await
    }

    pub async fn update(&self, id: i64, values: Value) -> Result<bool, OperationError> {
        self.api.update(MODEL, id, values).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, OperationError> {
        self.api.delete(MODEL, id).await
    }
}
