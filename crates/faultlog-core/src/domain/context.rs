//! Request context - the ambient request data attached to log lines
//!
//! `RequestContext` is a snapshot supplied by the host (CGI variables,
//! an HTTP request, or nothing at all for background processes).
//! `ExtractedContext` is the derived, log-ready view of it.

use std::collections::HashMap;

/// Variables read by [`RequestContext::from_server_vars`].
pub mod vars {
    pub const HOST: &str = "HTTP_HOST";
    pub const REQUEST_URI: &str = "REQUEST_URI";
    pub const HTTPS: &str = "HTTPS";
    pub const REFERER: &str = "HTTP_REFERER";
    pub const USER_AGENT: &str = "HTTP_USER_AGENT";
    pub const METHOD: &str = "REQUEST_METHOD";
    pub const FORWARDED_FOR: &str = "HTTP_X_FORWARDED_FOR";
    pub const REMOTE_ADDR: &str = "REMOTE_ADDR";
    pub const CLIENT_IP: &str = "HTTP_CLIENT_IP";
}

/// Ambient request metadata.
///
/// Every field is optional; missing values degrade to empty strings
/// in the extracted context instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub host: Option<String>,
    pub request_uri: Option<String>,
    /// HTTPS indicator, the connection is secure iff this equals `"on"`
    pub https: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub method: Option<String>,
    /// X-Forwarded-For header (highest client-IP priority)
    pub forwarded_for: Option<String>,
    /// Direct peer address
    pub remote_addr: Option<String>,
    /// Client-IP header (lowest client-IP priority)
    pub client_ip: Option<String>,
}

impl RequestContext {
    /// An empty context (no request, e.g. a background job).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from CGI-style server variables.
    pub fn from_server_vars<I, K, V>(server_vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map: HashMap<String, String> = server_vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();

        Self {
            host: map.remove(vars::HOST),
            request_uri: map.remove(vars::REQUEST_URI),
            https: map.remove(vars::HTTPS),
            referer: map.remove(vars::REFERER),
            user_agent: map.remove(vars::USER_AGENT),
            method: map.remove(vars::METHOD),
            forwarded_for: map.remove(vars::FORWARDED_FOR),
            remote_addr: map.remove(vars::REMOTE_ADDR),
            client_ip: map.remove(vars::CLIENT_IP),
        }
    }

    /// Build a context from the process environment (CGI hosts).
    ///
    /// Non-UTF-8 variables are skipped.
    pub fn from_cgi_env() -> Self {
        Self::from_server_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = Some(uri.into());
        self
    }

    pub fn with_https(mut self, https: impl Into<String>) -> Self {
        self.https = Some(https.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_forwarded_for(mut self, ip: impl Into<String>) -> Self {
        self.forwarded_for = Some(ip.into());
        self
    }

    pub fn with_remote_addr(mut self, ip: impl Into<String>) -> Self {
        self.remote_addr = Some(ip.into());
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// First non-empty of forwarded-for, remote address, client-IP header.
    pub fn client_address(&self) -> &str {
        [&self.forwarded_for, &self.remote_addr, &self.client_ip]
            .into_iter()
            .find_map(|v| non_empty(v))
            .unwrap_or("")
    }

    /// `"request url: ..."` or an empty string.
    pub fn request_url(&self) -> String {
        match (non_empty(&self.host), non_empty(&self.request_uri)) {
            (Some(host), Some(uri)) => {
                let scheme = if self.https.as_deref() == Some("on") {
                    "https"
                } else {
                    "http"
                };
                format!("request url: {}://{}{}", scheme, host, uri)
            }
            (None, Some(uri)) => format!("request url: {}", uri),
            _ => String::new(),
        }
    }

    /// Derive the log-ready view of this context.
    ///
    /// Line breaks inside values are folded to spaces.
    pub fn extract(&self) -> ExtractedContext {
        ExtractedContext {
            client_ip: fold_lines(self.client_address()),
            request_url: fold_lines(&self.request_url()),
            referer: fold_lines(non_empty(&self.referer).unwrap_or_default()),
            user_agent: fold_lines(non_empty(&self.user_agent).unwrap_or_default()),
            method: fold_lines(non_empty(&self.method).unwrap_or_default()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn fold_lines(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Context fields as they appear in log lines. Absent values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContext {
    pub client_ip: String,
    /// Already prefixed with `"request url: "` when present
    pub request_url: String,
    pub referer: String,
    pub user_agent: String,
    pub method: String,
}

impl From<&RequestContext> for ExtractedContext {
    fn from(ctx: &RequestContext) -> Self {
        ctx.extract()
    }
}
