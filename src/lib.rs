//! # teller
//!
//! A minimal HTTP client pipeline for front ends of a banking gateway.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The gateway owns the business rules — eligibility, interest, KYC
//! approval, fee schedules. teller does not ask. What every screen in front
//! of that gateway needs, and what this crate provides, are the four
//! cross-cutting concerns wrapped around every call:
//!
//! - **Correlation tagging** — a fresh UUID on every request under
//!   `X-Correlation-Id`, so a support ticket and a backend log line can meet.
//! - **Loading coordination** — one process-wide "busy" stream backed by a
//!   pending-request counter that provably returns to zero.
//! - **Error surfacing** — every failure becomes one transient notification
//!   with a human message and, when the gateway provides one, a correlation
//!   id; the error itself still propagates to the caller.
//! - **Bearer-token injection** — optional, toggleable at runtime, never
//!   overriding explicit per-request auth.
//!
//! Interceptors compose as an explicit ordered chain; registration order is
//! execution order. No retries, no timeouts, no backpressure — a failure is
//! surfaced once and the caller decides.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use teller::{LoadingTracker, Notifications, Pipeline, Request, Settings, TcpTransport};
//! use teller::middleware::{
//!     AuthConfig, BearerAuthInterceptor, CorrelationInterceptor, ErrorSurfaceInterceptor,
//!     LoadingInterceptor,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let tracker = LoadingTracker::new();
//!     let notifications = Notifications::new();
//!     let settings = Settings::new();
//!
//!     let pipeline = Pipeline::builder()
//!         .layer(LoadingInterceptor::new(tracker.clone()))
//!         .layer(CorrelationInterceptor::new())
//!         .layer(BearerAuthInterceptor::new(AuthConfig::default(), settings.clone()))
//!         .layer(ErrorSurfaceInterceptor::new(notifications.clone()))
//!         .transport(TcpTransport::new());
//!
//!     match pipeline.send(Request::get("http://gateway.internal/api/v1/accounts/ACC-1/balance")).await {
//!         Ok(resp) => println!("balance: {}", resp.text()),
//!         Err(err) => eprintln!("{}", err.user_message()),
//!     }
//! }
//! ```

mod envelope;
mod error;
mod gateway;
mod loading;
mod method;
mod notify;
mod pipeline;
mod request;
mod response;
mod settings;
mod transport;

pub mod middleware;

pub use envelope::ErrorEnvelope;
pub use error::{Error, FailedResponse};
pub use gateway::{Gateway, GatewayConfig, IDEMPOTENCY_HEADER, PaymentReceipt, TransferOrder};
pub use loading::{LoadingGuard, LoadingTracker};
pub use method::Method;
pub use notify::{Kind, Notification, Notifications};
pub use pipeline::{BoxFuture, Interceptor, Next, Pipeline, PipelineBuilder};
pub use request::Request;
pub use response::Response;
pub use settings::{BEARER_TOKEN, Settings, USE_AUTH_TOKEN};
pub use transport::{FnTransport, TcpTransport, Transport};
