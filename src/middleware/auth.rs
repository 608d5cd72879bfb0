//! Conditional bearer-token injection.

use crate::error::Error;
use crate::pipeline::{BoxFuture, Interceptor, Next};
use crate::request::Request;
use crate::response::Response;
use crate::settings::{self, Settings};

/// Build-time auth configuration. Defaults to a no-op interceptor.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    pub use_auth_token: bool,
    pub bearer_token: Option<String>,
}

/// Attaches `Authorization: Bearer <token>` when auth is enabled.
///
/// Two configuration sources, checked per request:
/// 1. the build-time [`AuthConfig`] given at construction;
/// 2. the runtime [`Settings`] keys `secure.useAuthToken` /
///    `secure.bearerToken`, which override the build-time values when set.
///
/// A request that already carries an `Authorization` header is never
/// touched — explicit per-request auth wins.
pub struct BearerAuthInterceptor {
    config: AuthConfig,
    settings: Settings,
}

impl BearerAuthInterceptor {
    pub fn new(config: AuthConfig, settings: Settings) -> Self {
        Self { config, settings }
    }

    /// The effective token, after runtime overrides. `None` disables the
    /// interceptor for this request.
    fn resolve(&self) -> Option<String> {
        let mut enabled = self.config.use_auth_token;
        let mut token = self.config.bearer_token.clone();

        if let Some(flag) = self.settings.flag(settings::USE_AUTH_TOKEN) {
            enabled = flag;
        }
        if let Some(runtime_token) = self.settings.get(settings::BEARER_TOKEN)
            && !runtime_token.trim().is_empty()
        {
            token = Some(runtime_token);
        }

        if enabled { token.filter(|t| !t.is_empty()) } else { None }
    }
}

impl Interceptor for BearerAuthInterceptor {
    fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(async move {
            if !req.has_header("Authorization")
                && let Some(token) = self.resolve()
            {
                req.set_header("Authorization", format!("Bearer {token}"));
            }
            next.run(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;

    use super::*;
    use crate::pipeline::Pipeline;
    use crate::transport::FnTransport;

    fn auth_pipeline(
        config: AuthConfig,
        settings: Settings,
        seen: Arc<Mutex<Vec<Option<String>>>>,
    ) -> Pipeline {
        Pipeline::builder()
            .layer(BearerAuthInterceptor::new(config, settings))
            .transport(FnTransport(move |req: Request| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock()
                        .unwrap()
                        .push(req.header_value("authorization").map(str::to_owned));
                    Ok(Response::new(200, vec![], Bytes::new()))
                }
            }))
    }

    fn enabled_config() -> AuthConfig {
        AuthConfig { use_auth_token: true, bearer_token: Some("build-token".to_owned()) }
    }

    #[tokio::test]
    async fn disabled_config_passes_through() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = auth_pipeline(AuthConfig::default(), Settings::new(), Arc::clone(&seen));
        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(seen.lock().unwrap()[0], None);
    }

    #[tokio::test]
    async fn enabled_config_attaches_the_token() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = auth_pipeline(enabled_config(), Settings::new(), Arc::clone(&seen));
        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(seen.lock().unwrap()[0].as_deref(), Some("Bearer build-token"));
    }

    #[tokio::test]
    async fn existing_authorization_header_is_never_overridden() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = auth_pipeline(enabled_config(), Settings::new(), Arc::clone(&seen));
        pipeline
            .send(Request::get("http://h/").header("Authorization", "Basic abc"))
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap()[0].as_deref(), Some("Basic abc"));
    }

    #[tokio::test]
    async fn runtime_settings_override_build_time_config() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let settings = Settings::new();
        let pipeline = auth_pipeline(enabled_config(), settings.clone(), Arc::clone(&seen));

        // runtime off-switch wins over the enabled build config
        settings.set(crate::settings::USE_AUTH_TOKEN, "false");
        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(seen.lock().unwrap()[0], None);

        // flipped back on with a runtime token, no rebuild needed
        settings.set(crate::settings::USE_AUTH_TOKEN, "true");
        settings.set(crate::settings::BEARER_TOKEN, "runtime-token");
        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(seen.lock().unwrap()[1].as_deref(), Some("Bearer runtime-token"));
    }

    #[tokio::test]
    async fn enabled_without_any_token_is_a_no_op() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let config = AuthConfig { use_auth_token: true, bearer_token: None };
        let pipeline = auth_pipeline(config, Settings::new(), Arc::clone(&seen));
        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(seen.lock().unwrap()[0], None);
    }
}
