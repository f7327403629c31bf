//! Shared test utilities and fixtures for Faultlog integration tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

pub use faultlog_core::{ErrorEvent, ErrorLogger, LogCategory, LoggerConfig, RequestContext};
use tempfile::TempDir;

/// Install a test subscriber once per test binary (`RUST_LOG` honoured).
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A logger writing below its own temporary folder.
pub struct TestLogger {
    pub dir: TempDir,
    pub logger: Arc<ErrorLogger>,
}

impl TestLogger {
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    /// `config` with its log folder replaced by a fresh temporary one.
    pub fn with_config(config: LoggerConfig) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("temp dir");
        let logger = Arc::new(ErrorLogger::new(config.with_log_folder(dir.path())));
        Self { dir, logger }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, category: LogCategory) -> PathBuf {
        self.logger.log_path(category)
    }

    /// Today's content of `category`, empty if nothing was written.
    pub fn read(&self, category: LogCategory) -> String {
        std::fs::read_to_string(self.path(category)).unwrap_or_default()
    }

    pub fn lines(&self, category: LogCategory) -> Vec<String> {
        self.read(category).lines().map(str::to_string).collect()
    }
}

impl Default for TestLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// A request context with every field populated.
pub fn full_context() -> RequestContext {
    RequestContext::new()
        .with_host("shop.example")
        .with_request_uri("/cart?id=7")
        .with_https("on")
        .with_referer("https://shop.example/")
        .with_user_agent("Mozilla/5.0")
        .with_method("POST")
        .with_remote_addr("198.51.100.4")
}
