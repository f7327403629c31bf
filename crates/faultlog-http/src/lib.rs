//! # Faultlog HTTP
//!
//! Axum integration: builds a [`RequestContext`](faultlog_core::RequestContext)
//! from an incoming request and logs every 404 response to the `404` category.

mod context;
mod middleware;

pub use context::{request_context, FORWARDED_PROTO};
pub use middleware::{not_found_middleware, with_not_found_logging};
