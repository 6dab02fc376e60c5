//! JSON-RPC 2.0 envelope building and response unwrapping.
//!
//! Requests carry `jsonrpc`/`method: "call"`/`params`/`id`; responses come
//! back as `{result}` or `{error}`. Successful search-read payloads have
//! shipped in three different shapes across backend and proxy versions —
//! [`normalize_search_read`] folds all of them into one record set.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde_json::{Value, json};

use campus_core::{OperationError, RecordSet};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Next request id. Monotonic per process; the backend only echoes it.
fn next_request_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Wrap `params` in the standard request envelope.
pub fn request(params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": params,
        "id": next_request_id(),
    })
}

/// Rpc error code the backend uses for an expired web session.
pub const SESSION_EXPIRED: i64 = 100;

/// Remote-reported failure, delivered inside an HTTP 200.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcFault {
    #[serde(default)]
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcFault {
    pub fn is_session_expired(&self) -> bool {
        self.code == SESSION_EXPIRED
    }

    /// Session-expiry faults are authentication failures; anything else is
    /// an operation failure carrying the remote code and payload.
    pub fn into_error(self) -> OperationError {
        if self.is_session_expired() {
            OperationError::Unauthorized(self.message)
        } else {
            OperationError::remote(self.code, self.message, self.data)
        }
    }
}

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcFault>,
}

/// Authentication result fields. Only `uid` is mandatory; everything else
/// may be missing or `false` depending on backend version.
#[derive(Debug, Default, Deserialize)]
pub struct AuthPayload {
    #[serde(default, deserialize_with = "crate::de::falsy_i64")]
    pub uid: Option<i64>,
    #[serde(default, deserialize_with = "crate::de::falsy_string")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "crate::de::falsy_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "crate::de::falsy_string")]
    pub db: Option<String>,
    #[serde(default, deserialize_with = "crate::de::falsy_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::de::falsy_i64")]
    pub partner_id: Option<i64>,
}

// ── search_read normalization ───────────────────────────────────────

/// The three search-read result shapes observed in the wild: a bare record
/// array, a `{records, length}` wrapper, and a double wrapper produced by
/// older proxy builds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchReadPayload {
    Wrapped {
        records: Vec<Value>,
        #[serde(default)]
        length: Option<u64>,
    },
    Double {
        records: Inner,
    },
    Bare(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct Inner {
    records: Vec<Value>,
    #[serde(default)]
    length: Option<u64>,
}

/// Fold any observed search-read shape into one record set. A missing
/// `length` falls back to the page size.
pub fn normalize_search_read(result: Value) -> Result<RecordSet<Value>, OperationError> {
    let payload: SearchReadPayload = serde_json::from_value(result).map_err(|e| {
        OperationError::remote(400, format!("unrecognized search_read response: {}", e), None)
    })?;

    let (records, length) = match payload {
        SearchReadPayload::Wrapped { records, length } => (records, length),
        SearchReadPayload::Double { records } => (records.records, records.length),
        SearchReadPayload::Bare(records) => (records, None),
    };
    let total = length.unwrap_or(records.len() as u64);
    Ok(RecordSet { records, total })
}
