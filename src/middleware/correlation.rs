//! Correlation-id tagging.

use tracing::debug;
use uuid::Uuid;

use crate::error::Error;
use crate::pipeline::{BoxFuture, Interceptor, Next};
use crate::request::Request;
use crate::response::Response;

/// Default correlation header name. The gateway echoes it back on both
/// successful responses and error envelopes.
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

/// Tags every outgoing request with a fresh UUID-v4 trace token.
///
/// Stateless across requests: the id lives for one call, travels to the
/// backend, and shows up again in support tickets. If the gateway echoes the
/// header on the response, the echo is logged for cross-checking.
pub struct CorrelationInterceptor {
    header: String,
}

impl CorrelationInterceptor {
    pub fn new() -> Self {
        Self { header: CORRELATION_HEADER.to_owned() }
    }

    /// Uses a non-default header name (some gateways want `X-Request-Id`).
    pub fn with_header(name: impl Into<String>) -> Self {
        Self { header: name.into() }
    }
}

impl Default for CorrelationInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for CorrelationInterceptor {
    fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(async move {
            let correlation_id = Uuid::new_v4().to_string();
            req.set_header(&self.header, correlation_id.as_str());
            debug!(
                correlation_id = %correlation_id,
                method = %req.method(),
                url = req.url(),
                "dispatching",
            );

            let result = next.run(req).await;

            if let Ok(resp) = &result
                && let Some(echoed) = resp.header(&self.header)
            {
                debug!(correlation_id = %echoed, "gateway echoed correlation id");
            }
            result
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

    fn capturing_pipeline(
        interceptor: CorrelationInterceptor,
        seen: Arc<Mutex<Vec<Option<String>>>>,
        header: &'static str,
    ) -> Pipeline {
        Pipeline::builder()
            .layer(interceptor)
            .transport(FnTransport(move |req: Request| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(req.header_value(header).map(str::to_owned));
                    Ok(Response::new(200, vec![], Bytes::new()))
                }
            }))
    }

    #[tokio::test]
    async fn every_request_gets_a_unique_uuid() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = capturing_pipeline(
            CorrelationInterceptor::new(),
            Arc::clone(&seen),
            CORRELATION_HEADER,
        );

        pipeline.send(Request::get("http://h/a")).await.unwrap();
        pipeline.send(Request::get("http://h/b")).await.unwrap();

        let seen = seen.lock().unwrap();
        let first = seen[0].as_deref().unwrap();
        let second = seen[1].as_deref().unwrap();
        assert_eq!(first.len(), 36);
        assert!(Uuid::parse_str(first).is_ok());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn custom_header_name() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = capturing_pipeline(
            CorrelationInterceptor::with_header("X-Request-Id"),
            Arc::clone(&seen),
            "X-Request-Id",
        );

        pipeline.send(Request::get("http://h/")).await.unwrap();
        assert!(seen.lock().unwrap()[0].is_some());
    }

    #[tokio::test]
    async fn downstream_errors_pass_through_untouched() {
        let pipeline = Pipeline::builder()
            .layer(CorrelationInterceptor::new())
            .transport(FnTransport(|_req: Request| async {
                Ok(Response::new(500, vec![], Bytes::new()))
            }));

        let err = pipeline.send(Request::get("http://h/")).await.unwrap_err();
        assert!(matches!(err, Error::Status(f) if f.status() == 500));
    }
}
