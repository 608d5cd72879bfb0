//! The interceptor chain.
//!
//! # How a request travels
//!
//! A [`Pipeline`] is an ordered list of interceptors in front of a
//! [`Transport`](crate::Transport). Each interceptor receives the request and
//! a [`Next`] handle holding the rest of the chain:
//!
//! ```text
//! pipeline.send(req)
//!        ↓
//! interceptor[0].handle(req, next)      ← outermost, first registered
//!        ↓ next.run(req)
//! interceptor[1].handle(req, next)
//!        ↓ next.run(req)
//! transport.send(req)                   ← the wire
//!        ↓
//! Response::into_result()               ← non-2xx becomes Err here
//! ```
//!
//! Registration order is execution order, and it matters: the loading
//! interceptor must be layered first so its bracket covers the time spent in
//! every inner layer, not just the time on the wire.
//!
//! Interceptors are stored as `Arc<dyn Interceptor>` — the same type-erasure
//! arrangement used for handlers everywhere else: one Arc clone and one
//! vtable call per layer per request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;

/// A heap-allocated, type-erased future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ── Interceptor ───────────────────────────────────────────────────────────────

/// A middleware layer wrapped around every outgoing request.
///
/// Implementations may adjust the request before forwarding it through
/// `next`, inspect the outcome on the way back, or both. An interceptor that
/// never calls [`Next::run`] short-circuits the chain — none of the built-in
/// ones do.
pub trait Interceptor: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Result<Response, Error>>;
}

/// The remainder of the chain, handed to each interceptor.
///
/// Consumed by [`run`](Next::run) — an interceptor forwards a request at most
/// once.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    /// Forwards the request to the next interceptor, or to the transport if
    /// this was the last layer. At the transport boundary a non-2xx response
    /// is converted into [`Error::Status`].
    pub async fn run(self, req: Request) -> Result<Response, Error> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                let next = Next { chain: rest, transport: self.transport };
                head.handle(req, next).await
            }
            None => {
                let resp = self.transport.send(req).await?;
                resp.into_result()
            }
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// An interceptor chain plus the transport behind it.
///
/// Build once at startup, share via `Arc`, and send every request through it:
///
/// ```rust,no_run
/// use teller::{Pipeline, Request, TcpTransport};
/// use teller::middleware::CorrelationInterceptor;
///
/// # async fn demo() -> Result<(), teller::Error> {
/// let pipeline = Pipeline::builder()
///     .layer(CorrelationInterceptor::new())
///     .transport(TcpTransport::new());
///
/// let resp = pipeline.send(Request::get("http://gateway.internal/api/v1/accounts/ACC-1/balance")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    chain: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder { chain: Vec::new() }
    }

    /// Sends one request through every layer and the transport.
    pub async fn send(&self, req: Request) -> Result<Response, Error> {
        Next { chain: &self.chain, transport: &*self.transport }.run(req).await
    }
}

/// Fluent builder for [`Pipeline`]. Layers run in the order they are added;
/// terminated by [`transport`](PipelineBuilder::transport).
pub struct PipelineBuilder {
    chain: Vec<Arc<dyn Interceptor>>,
}

impl PipelineBuilder {
    /// Appends an interceptor. The first layer added is the outermost.
    pub fn layer(mut self, interceptor: impl Interceptor) -> Self {
        self.chain.push(Arc::new(interceptor));
        self
    }

    /// Terminates the builder with the transport at the end of the chain.
    pub fn transport(self, transport: impl Transport) -> Pipeline {
        Pipeline { chain: self.chain, transport: Arc::new(transport) }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::transport::FnTransport;

    /// Records its tag on the way in and on the way out.
    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Tagger {
        fn handle<'a>(
            &'a self,
            req: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Result<Response, Error>> {
            Box::pin(async move {
                self.log.lock().unwrap().push(format!("{}>", self.tag));
                let result = next.run(req).await;
                self.log.lock().unwrap().push(format!("<{}", self.tag));
                result
            })
        }
    }

    fn ok_transport(status: u16) -> FnTransport<impl Fn(Request) -> BoxFuture<'static, Result<Response, Error>>> {
        FnTransport(move |_req: Request| -> BoxFuture<'static, Result<Response, Error>> {
            Box::pin(async move { Ok(Response::new(status, vec![], Bytes::new())) })
        })
    }

    #[tokio::test]
    async fn layers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .layer(Tagger { tag: "outer", log: Arc::clone(&log) })
            .layer(Tagger { tag: "inner", log: Arc::clone(&log) })
            .transport(ok_transport(200));

        pipeline.send(Request::get("http://h/")).await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(*log, ["outer>", "inner>", "<inner", "<outer"]);
    }

    #[tokio::test]
    async fn non_2xx_surfaces_as_error_through_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .layer(Tagger { tag: "outer", log: Arc::clone(&log) })
            .transport(ok_transport(503));

        let err = pipeline.send(Request::get("http://h/")).await.unwrap_err();
        let Error::Status(failed) = err else { panic!("expected status error") };
        assert_eq!(failed.status(), 503);
        // the layer still saw the request settle
        assert_eq!(*log.lock().unwrap(), ["outer>", "<outer"]);
    }

    #[tokio::test]
    async fn empty_chain_goes_straight_to_the_transport() {
        let pipeline = Pipeline::builder().transport(ok_transport(204));
        let resp = pipeline.send(Request::get("http://h/")).await.unwrap();
        assert_eq!(resp.status(), 204);
    }
}
