//! Error surfacing: failed calls become notifications.

use tracing::error;

use super::correlation::CORRELATION_HEADER;
use crate::error::Error;
use crate::notify::Notifications;
use crate::pipeline::{BoxFuture, Interceptor, Next};
use crate::request::Request;
use crate::response::Response;

/// Converts every failed call into exactly one error notification, then
/// re-raises the original error unchanged.
///
/// Presentation-layer enrichment only: the caller still sees the failure and
/// decides whether to retry, render inline, or give up. The notification
/// message and correlation id follow the precedence in
/// [`Error::user_message`] and [`Error::correlation_id`].
pub struct ErrorSurfaceInterceptor {
    notifications: Notifications,
    correlation_header: String,
}

impl ErrorSurfaceInterceptor {
    pub fn new(notifications: Notifications) -> Self {
        Self { notifications, correlation_header: CORRELATION_HEADER.to_owned() }
    }

    /// Uses a non-default correlation header for the header fallback. Must
    /// match the name the correlation interceptor tags requests with.
    pub fn with_header(notifications: Notifications, name: impl Into<String>) -> Self {
        Self { notifications, correlation_header: name.into() }
    }
}

impl Interceptor for ErrorSurfaceInterceptor {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(async move {
            match next.run(req).await {
                Ok(resp) => Ok(resp),
                Err(err) => {
                    let message = err.user_message();
                    let correlation_id = err.correlation_id(&self.correlation_header);
                    error!(
                        message = %message,
                        correlation_id = correlation_id.as_deref().unwrap_or("-"),
                        "request failed",
                    );
                    self.notifications.error(message, correlation_id);
                    Err(err)
                }
            }
        })
    }
}
