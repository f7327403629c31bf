//! A single reported error occurrence

use super::Severity;

/// Raw error data as received at the handler boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    /// Severity code (usually one of [`Severity`], but any value is accepted)
    pub code: i64,
    pub message: String,
    pub file: String,
    pub line: u32,
    /// Extra text appended below the line, typically a rendered stack trace
    pub extra: String,
}

impl ErrorEvent {
    pub fn new(
        code: impl Into<i64>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: file.into(),
            line,
            extra: String::new(),
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    /// Attach a flattened trace as the `Stack trace:` block.
    pub fn with_trace(self, trace: &[String]) -> Self {
        if trace.is_empty() {
            return self.with_extra("\tStack trace:");
        }
        let extra = format!("\tStack trace:\n\t{}", trace.join("\n\t"));
        self.with_extra(extra)
    }

    pub fn severity(&self) -> Option<Severity> {
        Severity::from_code(self.code)
    }
}
