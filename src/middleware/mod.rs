//! Built-in interceptors.
//!
//! Four cross-cutting concerns, each its own layer:
//!
//! - [`LoadingInterceptor`] — brackets every request with the global
//!   pending-request counter. Layer this **first** so the bracket covers the
//!   time spent in every inner layer.
//! - [`CorrelationInterceptor`] — a fresh trace token on every request.
//! - [`BearerAuthInterceptor`] — conditional `Authorization` header.
//! - [`ErrorSurfaceInterceptor`] — failed calls become user-visible
//!   notifications, then re-raise.
//!
//! The conventional order:
//!
//! ```rust,no_run
//! use teller::{LoadingTracker, Notifications, Pipeline, Settings, TcpTransport};
//! use teller::middleware::{
//!     AuthConfig, BearerAuthInterceptor, CorrelationInterceptor, ErrorSurfaceInterceptor,
//!     LoadingInterceptor,
//! };
//!
//! let tracker = LoadingTracker::new();
//! let notifications = Notifications::new();
//! let settings = Settings::new();
//!
//! let pipeline = Pipeline::builder()
//!     .layer(LoadingInterceptor::new(tracker.clone()))
//!     .layer(CorrelationInterceptor::new())
//!     .layer(BearerAuthInterceptor::new(AuthConfig::default(), settings.clone()))
//!     .layer(ErrorSurfaceInterceptor::new(notifications.clone()))
//!     .transport(TcpTransport::new());
//! ```

mod auth;
mod correlation;
mod loading;
mod surface;

pub use auth::{AuthConfig, BearerAuthInterceptor};
pub use correlation::{CORRELATION_HEADER, CorrelationInterceptor};
pub use loading::LoadingInterceptor;
pub use surface::ErrorSurfaceInterceptor;
