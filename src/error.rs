//! Unified error type.
//!
//! A call through the pipeline fails in one of four ways: the URL was
//! malformed, the connection itself failed, the body could not be
//! (de)serialized, or the gateway answered with a non-2xx status. The last
//! case keeps the whole response around so upper layers can read the error
//! envelope and the correlation header out of it.

use std::fmt;
use std::io;

use bytes::Bytes;

use crate::envelope::ErrorEnvelope;

/// The error type returned by teller's fallible operations.
#[derive(Debug)]
pub enum Error {
    /// Network-level failure. No response was received.
    Transport(io::Error),
    /// The request URL could not be parsed, or uses an unsupported scheme.
    InvalidUrl(String),
    /// A request or response body failed JSON (de)serialization.
    Json(serde_json::Error),
    /// The gateway responded with a non-2xx status.
    Status(Box<FailedResponse>),
}

impl Error {
    /// The human-readable message shown to the user for this failure.
    ///
    /// Precedence: the envelope's `message` field, then the transport error's
    /// own message, then a bare `HTTP <status>`, then `"Unexpected error"`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status(failed) => failed
                .envelope()
                .and_then(|env| env.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {}", failed.status())),
            Self::Transport(e) => {
                let msg = e.to_string();
                if msg.trim().is_empty() { "Unexpected error".to_owned() } else { msg }
            }
            Self::InvalidUrl(url) => format!("invalid URL: {url}"),
            Self::Json(_) => "Unexpected error".to_owned(),
        }
    }

    /// The correlation id associated with this failure, if the gateway
    /// reported one.
    ///
    /// The envelope's `correlationId` field wins; the response header under
    /// `header_name` is the fallback. Transport failures never carry one.
    pub fn correlation_id(&self, header_name: &str) -> Option<String> {
        let Self::Status(failed) = self else { return None };
        failed
            .envelope()
            .and_then(|env| env.correlation_id)
            .filter(|id| !id.is_empty())
            .or_else(|| failed.header(header_name).map(str::to_owned))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::InvalidUrl(url) => write!(f, "invalid URL: {url}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Status(failed) => write!(f, "HTTP {}", failed.status()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidUrl(_) | Self::Status(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ── FailedResponse ────────────────────────────────────────────────────────────

/// A complete non-2xx response, preserved inside [`Error::Status`].
#[derive(Debug)]
pub struct FailedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl FailedResponse {
    pub(crate) fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The parsed error envelope, when the body carries one.
    pub fn envelope(&self) -> Option<ErrorEnvelope> {
        ErrorEnvelope::parse(&self.body)
    }
}
