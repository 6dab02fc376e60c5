use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size applied when a query does not set one.
///
/// This is a pagination ceiling, not a hard limit — callers page further by
/// raising `offset`.
pub const DEFAULT_LIMIT: u32 = 80;

// ── Domain ──────────────────────────────────────────────────────────

/// One element of a search domain.
///
/// Domains use prefix notation: a term is either a
/// `[field, operator, value]` triple or a bare logical operator
/// (`"&"`, `"|"`, `"!"`) combining the terms that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainTerm {
    Logic(String),
    Clause(String, String, Value),
}

/// Ordered list of [`DomainTerm`]s restricting which records a query
/// matches. Serializes to the backend's nested-array form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain(pub Vec<DomainTerm>);

impl Domain {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a `[field, operator, value]` clause. Consecutive clauses are
    /// AND-combined, the backend's implicit default.
    pub fn filter(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.0.push(clause(field, operator, value));
        self
    }

    /// Append a group of clauses OR-combined with each other: prefix
    /// notation needs `n - 1` leading `"|"` markers.
    pub fn any_of(mut self, clauses: Vec<DomainTerm>) -> Self {
        for _ in 1..clauses.len() {
            self.0.push(DomainTerm::Logic("|".into()));
        }
        self.0.extend(clauses);
        self
    }
}

/// Build a single `[field, operator, value]` clause.
pub fn clause(field: &str, operator: &str, value: impl Into<Value>) -> DomainTerm {
    DomainTerm::Clause(field.to_string(), operator.to_string(), value.into())
}

// ── RecordQuery ─────────────────────────────────────────────────────

/// Parameters for a search-read call. Immutable per call — build one with
/// the chainable setters and hand it to the record API.
///
/// An empty `fields` list means "all known fields"; an empty `order` means
/// backend default ordering.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    pub domain: Domain,
    pub fields: Vec<String>,
    pub limit: u32,
    pub offset: u32,
    pub order: String,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            domain: Domain::new(),
            fields: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            order: String::new(),
        }
    }
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn order(mut self, order: &str) -> Self {
        self.order = order.to_string();
        self
    }
}

// ── Results ─────────────────────────────────────────────────────────

/// One page of records plus the server-side total.
///
/// `total` counts every matching record, not just the page returned, so
/// callers can drive pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet<T> {
    pub records: Vec<T>,
    pub total: u64,
}

impl<T> RecordSet<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }
}

/// Identifier assigned by the backend on create. The full record is not
/// returned — re-fetch if you need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_serializes_to_nested_arrays() {
        let d = Domain::new()
            .filter("is_company", "=", false)
            .filter("customer_rank", ">", 0);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!([["is_company", "=", false], ["customer_rank", ">", 0]])
        );
    }

    #[test]
    fn any_of_emits_prefix_or_markers() {
        let d = Domain::new().filter("active", "=", true).any_of(vec![
            clause("name", "ilike", "ana"),
            clause("email", "ilike", "ana"),
            clause("phone", "ilike", "ana"),
        ]);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!([
                ["active", "=", true],
                "|",
                "|",
                ["name", "ilike", "ana"],
                ["email", "ilike", "ana"],
                ["phone", "ilike", "ana"]
            ])
        );
    }

    #[test]
    fn any_of_single_clause_has_no_marker() {
        let d = Domain::new().any_of(vec![clause("name", "ilike", "x")]);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!([["name", "ilike", "x"]])
        );
    }

    #[test]
    fn query_defaults() {
        let q = RecordQuery::new();
        assert!(q.domain.is_empty());
        assert!(q.fields.is_empty());
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.offset, 0);
        assert!(q.order.is_empty());
    }

    #[test]
    fn domain_deserializes_back() {
        let raw = json!([["id", "=", 7], "|", ["a", "=", 1], ["b", "=", 2]]);
        let d: Domain = serde_json::from_value(raw).unwrap();
        assert_eq!(d.0.len(), 4);
        assert_eq!(d.0[1], DomainTerm::Logic("|".into()));
    }
}
