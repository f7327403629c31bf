//! 404 logging middleware

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    Router,
};
use faultlog_core::ErrorLogger;
use tracing::{debug, warn};

use crate::context::request_context;

/// Log every `404 Not Found` response through [`ErrorLogger::log_not_found`].
///
/// The context is captured before the inner service runs; the file write
/// happens on the blocking pool.
pub async fn not_found_middleware(
    State(logger): State<Arc<ErrorLogger>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = request_context(&request);
    let response = next.run(request).await;

    if response.status() == StatusCode::NOT_FOUND {
        match tokio::task::spawn_blocking(move || logger.log_not_found(&ctx)).await {
            Ok(true) => debug!("[NotFound] 404 recorded"),
            Ok(false) => warn!("[NotFound] Could not write 404 record"),
            Err(e) => warn!("[NotFound] Logging task failed: {}", e),
        }
    }

    response
}

/// Wrap every route (and the fallback) of `router` with [`not_found_middleware`].
///
/// Call after all routes are added.
pub fn with_not_found_logging<S>(router: Router<S>, logger: Arc<ErrorLogger>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(logger, not_found_middleware))
}
