//! Runtime settings surface.
//!
//! A small string key/value store read by interceptors at request time, so
//! behaviour can be toggled (e.g. from a settings screen) without rebuilding
//! or re-wiring the pipeline. The auth interceptor reads the `secure.*` keys
//! on every request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Whether the bearer-token interceptor is active. `"true"` / `"false"`.
pub const USE_AUTH_TOKEN: &str = "secure.useAuthToken";
/// The bearer token value itself.
pub const BEARER_TOKEN: &str = "secure.bearerToken";

/// Shared runtime settings. Handles are cheap to clone and share one map.
#[derive(Clone, Default)]
pub struct Settings {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().expect("settings poisoned").get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().expect("settings poisoned").insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.inner.lock().expect("settings poisoned").remove(key);
    }

    /// A boolean-valued setting. `None` when the key is unset, so callers can
    /// fall back to their build-time default.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v == "true")
    }
}
