//! Severity codes and their log labels

/// Numeric error severity (bitmask values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Parse,
    Notice,
    CoreError,
    CoreWarning,
    CompileError,
    CompileWarning,
    UserError,
    UserWarning,
    UserNotice,
    Strict,
    RecoverableError,
    Deprecated,
    UserDeprecated,
    All,
}

impl Severity {
    /// Every severity, in ascending code order.
    pub const ALL: [Severity; 16] = [
        Self::Error,
        Self::Warning,
        Self::Parse,
        Self::Notice,
        Self::CoreError,
        Self::CoreWarning,
        Self::CompileError,
        Self::CompileWarning,
        Self::UserError,
        Self::UserWarning,
        Self::UserNotice,
        Self::Strict,
        Self::RecoverableError,
        Self::Deprecated,
        Self::UserDeprecated,
        Self::All,
    ];

    pub fn code(&self) -> i64 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Parse => 4,
            Self::Notice => 8,
            Self::CoreError => 16,
            Self::CoreWarning => 32,
            Self::CompileError => 64,
            Self::CompileWarning => 128,
            Self::UserError => 256,
            Self::UserWarning => 512,
            Self::UserNotice => 1024,
            Self::Strict => 2048,
            Self::RecoverableError => 4096,
            Self::Deprecated => 8192,
            Self::UserDeprecated => 16384,
            Self::All => 32767,
        }
    }

    /// Label written into log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Parse => "Parse",
            Self::Notice => "Notice",
            Self::CoreError => "Core error",
            Self::CoreWarning => "Core Warning",
            Self::CompileError => "Compile Error",
            Self::CompileWarning => "Compile Warning",
            Self::UserError => "User error",
            Self::UserWarning => "User warning",
            Self::UserNotice => "User notice",
            Self::Strict => "Strict",
            Self::RecoverableError => "Recoverable error",
            Self::Deprecated => "Deprecated",
            Self::UserDeprecated => "User Deprecated",
            Self::All => "All",
        }
    }

    /// Exact lookup; combined masks other than `All` are not severities.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl From<Severity> for i64 {
    fn from(severity: Severity) -> Self {
        severity.code()
    }
}

/// Translate a raw severity code into its label.
///
/// Unknown codes translate to an empty string.
pub fn translate(code: i64) -> &'static str {
    Severity::from_code(code).map(|s| s.label()).unwrap_or("")
}
