//! The gateway's standard error envelope.
//!
//! Every backend service behind the gateway reports failures with the same
//! JSON shape:
//!
//! ```json
//! {
//!   "timestamp": "2026-08-26T10:15:30Z",
//!   "status": 422,
//!   "error": "Unprocessable Entity",
//!   "message": "Insufficient funds",
//!   "correlationId": "0b1f3e9c-…",
//!   "path": "/api/v1/payments/internal-transfer"
//! }
//! ```
//!
//! Services are not always disciplined about filling every field, so each one
//! is optional and unknown fields are ignored. A body that is not JSON at all
//! simply yields no envelope.

use serde::Deserialize;

/// A parsed error envelope. Any field may be absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub timestamp: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub correlation_id: Option<String>,
    pub path: Option<String>,
}

impl ErrorEnvelope {
    /// Parses an envelope from a response body. `None` if the body is not a
    /// JSON object.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}
