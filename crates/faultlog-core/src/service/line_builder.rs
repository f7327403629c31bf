//! Log line builder
//!
//! Every line is `"[" + RFC 2822 timestamp + "] " + client + body + "\n"`.
//! Multi-line content is continued on tab-indented lines so a record
//! never contains a bare newline.

use chrono::{DateTime, FixedOffset};

use crate::domain::{translate, ErrorEvent, ExtractedContext};

/// Prefix of the generic error body
pub const ERROR_PREFIX: &str = "PHP";

/// Renders log lines for one timestamp and request context.
pub struct LogLineBuilder<'a> {
    timestamp: DateTime<FixedOffset>,
    context: &'a ExtractedContext,
}

impl<'a> LogLineBuilder<'a> {
    pub fn new(timestamp: DateTime<FixedOffset>, context: &'a ExtractedContext) -> Self {
        Self { timestamp, context }
    }

    /// Generic error line (the `php` category).
    pub fn error_line(&self, event: &ErrorEvent) -> String {
        let mut body = format!("{} {}: ", ERROR_PREFIX, translate(event.code));
        if !event.message.is_empty() {
            body.push_str(&continuation(&event.message));
            body.push(' ');
        }
        body.push_str(&format!(
            "in {}:{} ({})",
            single_line(&event.file),
            event.line,
            event.code
        ));
        if !self.context.referer.is_empty() {
            body.push_str(&format!(", referer: {} ", self.context.referer));
        }

        let mut block = Vec::new();
        if !self.context.request_url.is_empty() {
            block.push(format!("\t{}", self.context.request_url));
        }
        let extra = extra_block(&event.extra);
        if !extra.is_empty() {
            block.push(extra);
        }
        if !block.is_empty() {
            body.push('\n');
            body.push_str(&block.join("\n"));
        }

        self.finish(body)
    }

    /// Not-found line (the `404` category).
    pub fn not_found_line(&self) -> String {
        let mut body = self.context.request_url.clone();
        if !self.context.method.is_empty() {
            body.push_str(&format!(" ({})", self.context.method));
        }
        if !self.context.referer.is_empty() {
            body.push_str(&format!(", referer: {} ", self.context.referer));
        }
        if !self.context.user_agent.is_empty() {
            body.push_str(&format!(", useragent: {} ", self.context.user_agent));
        }
        self.finish(body)
    }

    /// Failed-login line (the `login` category).
    pub fn failed_login_line(&self, username: &str) -> String {
        let mut body = format!("User: '{}'", continuation(username));
        if !self.context.referer.is_empty() {
            body.push_str(&format!(" referer: {} ", self.context.referer));
        }
        self.finish(body)
    }

    fn finish(&self, body: String) -> String {
        let mut line = format!("[{}] ", self.timestamp.to_rfc2822());
        if !self.context.client_ip.is_empty() {
            line.push_str(&format!("[ client {} ] ", self.context.client_ip));
        }
        line.push_str(body.trim_end_matches(['\n', '\r']));
        line.push('\n');
        line
    }
}

/// Continue embedded lines of a single value on tab-indented lines.
fn continuation(value: &str) -> String {
    let mut lines = value.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push_str("\n\t");
        out.push_str(line);
    }
    out
}

/// Values that have no place for continuation lines lose their line breaks.
fn single_line(value: &str) -> String {
    value.lines().collect::<Vec<_>>().join(" ")
}

/// Ensure every line of the extra block is tab-indented.
fn extra_block(extra: &str) -> String {
    extra
        .trim_end_matches(['\n', '\r'])
        .lines()
        .map(|line| {
            if line.starts_with('\t') {
                line.to_string()
            } else {
                format!("\t{}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
