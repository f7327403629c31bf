//! # Faultlog Hooks
//!
//! Installs an [`ErrorLogger`] as the process-wide error handler:
//!
//! - panics are logged as `Error` records with their backtrace
//! - [`trigger_error!`] reports an error through the installed logger
//! - dropping the returned [`ShutdownGuard`] logs the last fatal error
//!
//! ```no_run
//! use std::sync::Arc;
//! use faultlog_core::{ErrorLogger, LoggerConfig};
//!
//! let logger = Arc::new(ErrorLogger::new(LoggerConfig::default().with_log_folder("/var/log/app")));
//! let _guard = faultlog_hooks::set_handler(logger);
//!
//! faultlog_hooks::trigger_error!(faultlog_core::Severity::UserWarning, "cache is cold");
//! ```

use std::any::Any;
use std::backtrace::Backtrace;
use std::sync::Arc;

use faultlog_core::{frames_from_backtrace, ErrorEvent, ErrorLogger, RequestContext, Severity};
use parking_lot::RwLock;
use tracing::{debug, warn};

static HANDLER: RwLock<Option<Arc<ErrorLogger>>> = parking_lot::const_rwlock(None);

/// Entry points of the panic runtime. Everything above the last of them
/// belongs to the unwind machinery, everything below to the panicking code.
const PANIC_ENTRY_POINTS: &[&str] = &[
    "rust_begin_unwind",
    "core::panicking::",
    "std::panicking::begin_panic",
    "std::panic::panic_any",
    "core::result::unwrap_failed",
    "core::option::unwrap_failed",
    "core::option::expect_failed",
];

/// Install `logger` as the process-wide handler.
///
/// Replaces any previously installed logger and panic hook. The returned
/// guard runs [`ErrorLogger::on_shutdown`] when dropped; keep it alive
/// for the lifetime of `main`.
#[must_use = "dropping the guard immediately runs the shutdown handler"]
pub fn set_handler(logger: Arc<ErrorLogger>) -> ShutdownGuard {
    *HANDLER.write() = Some(logger.clone());
    std::panic::set_hook(Box::new(|info| {
        let location = info.location();
        report_panic(
            panic_message(info.payload()),
            location.map(|l| l.file()).unwrap_or_default(),
            location.map(|l| l.line()).unwrap_or_default(),
        );
    }));
    debug!("[ErrorHandler] Installed for {:?}", logger.config().log_folder);

    ShutdownGuard { logger }
}

/// The currently installed logger.
pub fn handler() -> Option<Arc<ErrorLogger>> {
    HANDLER.read().clone()
}

/// Report an error to the installed logger.
///
/// Returns `false` when no logger is installed or the write failed.
/// Prefer the [`trigger_error!`] macro, which fills in the location.
/// The logged trace starts at the caller of this function.
#[inline(never)]
pub fn dispatch_error(code: impl Into<i64>, message: &str, file: &str, line: u32) -> bool {
    let Some(logger) = handler() else {
        warn!("[ErrorHandler] No handler installed, dropping: {}", message);
        return false;
    };
    if logger.error_reporting() == 0 {
        return true;
    }

    let frames = frames_from_backtrace(&Backtrace::force_capture());
    let event = ErrorEvent::new(code, message, file, line);
    logger.on_error_with_frames(&RequestContext::from_cgi_env(), event, frames)
}

/// Report an error at the call site through the installed logger.
///
/// ```ignore
/// trigger_error!(Severity::UserWarning, "disk at {}%", 95);
/// ```
#[macro_export]
macro_rules! trigger_error {
    ($code:expr, $($arg:tt)+) => {
        $crate::dispatch_error(
            $code,
            &::std::format!($($arg)+),
            ::std::file!(),
            ::std::line!(),
        )
    };
}

/// Runs the shutdown handler of the logger it was created for.
pub struct ShutdownGuard {
    logger: Arc<ErrorLogger>,
}

impl ShutdownGuard {
    pub fn logger(&self) -> &Arc<ErrorLogger> {
        &self.logger
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.logger.on_shutdown(&RequestContext::from_cgi_env());
    }
}

fn report_panic(message: String, file: &str, line: u32) {
    // a writer may hold the lock while panicking, never wait on it here
    let Some(logger) = HANDLER.try_read().and_then(|h| h.clone()) else {
        return;
    };

    let frames = strip_panic_machinery(frames_from_backtrace(&Backtrace::force_capture()));
    let event = ErrorEvent::new(Severity::Error, message, file, line);
    if !logger.report_fatal(&RequestContext::from_cgi_env(), event, frames) {
        warn!("[ErrorHandler] Panic kept for shutdown, log write failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Keep the hook frame (dropped later as the handler frame) followed by
/// the frames below the last panic entry point.
///
/// Without a recognisable entry point the frames are kept as they are.
fn strip_panic_machinery(frames: Vec<String>) -> Vec<String> {
    let Some(last_entry) = frames.iter().rposition(|frame| is_panic_entry(frame)) else {
        return frames;
    };

    let mut frames = frames.into_iter();
    let hook = frames.next();
    hook.into_iter().chain(frames.skip(last_entry)).collect()
}

fn is_panic_entry(frame: &str) -> bool {
    let symbol = frame.split_once(' ').map(|(_, s)| s).unwrap_or_default();
    let symbol = symbol.strip_prefix("__rustc::").unwrap_or(symbol);
    PANIC_ENTRY_POINTS.iter().any(|p| symbol.starts_with(p))
}
