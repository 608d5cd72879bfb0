//! Incoming HTTP response type.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, FailedResponse};

/// A response received from the gateway.
///
/// The body is [`Bytes`], so holding on to it after the response moves into
/// an [`Error::Status`] costs a reference count, not a copy.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Converts a non-2xx response into [`Error::Status`].
    ///
    /// The pipeline applies this at the end of the chain, so every
    /// interceptor above sees gateway failures as `Err` — the same contract
    /// the surrounding application code is written against.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status(Box::new(FailedResponse::new(
                self.status,
                self.headers,
                self.body,
            ))))
        }
    }
}
