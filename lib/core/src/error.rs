use thiserror::Error;

// ── OperationError ──────────────────────────────────────────────────

/// Unified error type surfaced by every fallible client operation.
///
/// The transport layer is the only place raw network/HTTP outcomes are
/// classified into these variants; everything above it sees this type and
/// nothing else. Consumers match on the variant (or on
/// [`OperationError::code`]) — never on the message string, which may be
/// reworded. A missing record is not an error: lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum OperationError {
    /// Bad credentials or an expired session. Code 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Backend unreachable or the call timed out. Code 503.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The client refused to send the call (invalid input). Code 400.
    #[error("{0}")]
    BadRequest(String),

    /// Backend reachable but it rejected the operation. `data` carries the
    /// opaque remote payload, when the backend supplied one.
    #[error("{message}")]
    OperationFailed {
        code: u16,
        message: String,
        data: Option<serde_json::Value>,
    },
}

impl OperationError {
    /// Numeric code for this error.
    pub fn code(&self) -> u16 {
        match self {
            OperationError::Unauthorized(_) => 401,
            OperationError::ServiceUnavailable(_) => 503,
            OperationError::BadRequest(_) => 400,
            OperationError::OperationFailed { code, .. } => *code,
        }
    }

    /// Build an [`OperationError::OperationFailed`] from a remote-reported
    /// failure. Remote codes outside the 400..600 range are clamped to 400.
    pub fn remote(
        code: i64,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        let code = u16::try_from(code)
            .ok()
            .filter(|c| (400..600).contains(c))
            .unwrap_or(400);
        OperationError::OperationFailed {
            code,
            message: message.into(),
            data,
        }
    }
}
