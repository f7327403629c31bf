//! Request context from an axum request

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, HeaderName, Request};
use faultlog_core::RequestContext;

/// Scheme header set by TLS-terminating proxies
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

const FORWARDED_FOR: &str = "x-forwarded-for";
const CLIENT_IP: &str = "client-ip";

/// Snapshot the log-relevant parts of `request`.
///
/// The peer address is taken from `ConnectInfo<SocketAddr>` when the
/// server was started with `into_make_service_with_connect_info`.
/// Header values that are not valid UTF-8 are treated as absent.
pub fn request_context<B>(request: &Request<B>) -> RequestContext {
    let headers = request.headers();
    let uri = request.uri();

    let host = header_value(headers, &header::HOST)
        .or_else(|| uri.authority().map(|a| a.to_string()));
    let secure = header_value(headers, &HeaderName::from_static(FORWARDED_PROTO))
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or_else(|| uri.scheme_str() == Some("https"));

    RequestContext {
        host,
        request_uri: uri.path_and_query().map(|pq| pq.to_string()),
        https: secure.then(|| "on".to_string()),
        referer: header_value(headers, &header::REFERER),
        user_agent: header_value(headers, &header::USER_AGENT),
        method: Some(request.method().to_string()),
        forwarded_for: header_value(headers, &HeaderName::from_static(FORWARDED_FOR)),
        remote_addr: request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
        client_ip: header_value(headers, &HeaderName::from_static(CLIENT_IP)),
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
