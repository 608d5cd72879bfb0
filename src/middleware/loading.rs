//! Loading bracket around every request.

use crate::error::Error;
use crate::loading::LoadingTracker;
use crate::pipeline::{BoxFuture, Interceptor, Next};
use crate::request::Request;
use crate::response::Response;

/// Brackets each request with [`LoadingTracker::start`] / `stop`.
///
/// The stop side rides on a guard dropped when the request future settles —
/// success, error, or cancellation all release exactly once. A component
/// tearing down mid-request therefore cannot strand the global spinner; the
/// tracker's `reset()` remains available as a belt-and-braces recovery for
/// call sites that bypass the pipeline.
pub struct LoadingInterceptor {
    tracker: LoadingTracker,
}

impl LoadingInterceptor {
    pub fn new(tracker: LoadingTracker) -> Self {
        Self { tracker }
    }
}

impl Interceptor for LoadingInterceptor {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(async move {
            let _guard = self.tracker.begin();
            next.run(req).await
        })
    }
}
