pub mod annotation;
pub mod error;
pub mod query;

pub use annotation::StudentExtra;
pub use error::OperationError;
pub use query::{CreatedRecord, DEFAULT_LIMIT, Domain, DomainTerm, RecordQuery, RecordSet, clause};
