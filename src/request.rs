//! Outgoing HTTP request type.
//!
//! Requests are plain owned values. Interceptors receive the request by
//! value, adjust headers in place, and pass it on — no cloning ceremony.

use crate::method::Method;

/// An outgoing HTTP request.
///
/// ```rust
/// use teller::Request;
///
/// let req = Request::post("http://gateway.internal/api/v1/payments/internal-transfer")
///     .json(br#"{"amount":10.0}"#.to_vec())
///     .header("Idempotency-Key", "5fce9e3d-…");
/// ```
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: Vec::new() }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Sets a header, replacing any existing value. Returns `self` for chaining.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Attaches a JSON body (`content-type: application/json`).
    ///
    /// Pass bytes from your serialiser directly: `serde_json::to_vec(&order)?`.
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.set_header("content-type", "application/json");
        self.body = body;
        self
    }

    /// Sets a header in place, replacing an existing value case-insensitively.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.into(),
            None => self.headers.push((name.to_owned(), value.into())),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header_value(name).is_some()
    }
}
