//! Error logger - the public logging operations
//!
//! Every operation renders one line and appends it to the file of its
//! category. Failures never escape: each operation returns `false` and
//! reports the cause through `tracing`, so a failing log write cannot
//! fault-loop the error handler that called it.

use std::backtrace::Backtrace;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Local};
use parking_lot::Mutex;
use tracing::{debug, error};

use super::line_builder::LogLineBuilder;
use super::log_writer::LogWriter;
use super::trace_flattener::flatten_trace;
use crate::domain::{
    frames_from_backtrace, ErrorEvent, ErrorNode, LogCategory, LoggerConfig, RequestContext,
    Throwable,
};

/// Process-wide error logger.
///
/// Built once from an immutable [`LoggerConfig`] and shared (usually as
/// `Arc<ErrorLogger>`). The only mutable state is the error-reporting
/// level and the last unlogged fatal error.
pub struct ErrorLogger {
    config: LoggerConfig,
    writer: LogWriter,
    error_reporting: AtomicI64,
    last_fatal: Mutex<Option<ErrorEvent>>,
}

impl ErrorLogger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            writer: LogWriter::new(&config.log_folder),
            error_reporting: AtomicI64::new(config.error_reporting),
            last_fatal: Mutex::new(None),
            config,
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    /// Today's log file for `category`.
    pub fn log_path(&self, category: LogCategory) -> PathBuf {
        self.writer.target(category, Local::now().date_naive()).path()
    }

    // -------------------------------------------------------------------------
    // Error reporting level
    // -------------------------------------------------------------------------

    pub fn error_reporting(&self) -> i64 {
        self.error_reporting.load(Ordering::Relaxed)
    }

    /// Set the level and return the previous one.
    pub fn set_error_reporting(&self, level: i64) -> i64 {
        self.error_reporting.swap(level, Ordering::Relaxed)
    }

    /// Disable `on_error` until the returned guard is dropped.
    pub fn silence(&self) -> SilenceGuard<'_> {
        SilenceGuard {
            logger: self,
            previous: self.set_error_reporting(0),
        }
    }

    // -------------------------------------------------------------------------
    // Logging operations
    // -------------------------------------------------------------------------

    /// Log a generic error line to the `php` category.
    pub fn log_errors(&self, ctx: &RequestContext, event: &ErrorEvent) -> bool {
        let now = now();
        let line = LogLineBuilder::new(now, &ctx.extract()).error_line(event);
        self.emit(LogCategory::Php, now, &line)
    }

    /// Log an error and its whole cause chain.
    pub fn log_exception(&self, ctx: &RequestContext, throwable: &dyn Throwable) -> bool {
        let trace = match flatten_trace(throwable, false) {
            Ok(trace) => trace,
            Err(e) => {
                error!("[ErrorLogger] Refusing to log {:?}: {}", throwable.message(), e);
                return false;
            }
        };

        let event = ErrorEvent::new(
            throwable.code(),
            throwable.message(),
            throwable.file(),
            throwable.line(),
        )
        .with_trace(&trace);
        self.log_errors(ctx, &event)
    }

    /// Log a request that resolved to nothing.
    pub fn log_not_found(&self, ctx: &RequestContext) -> bool {
        let now = now();
        let line = LogLineBuilder::new(now, &ctx.extract()).not_found_line();
        self.emit(LogCategory::NotFound, now, &line)
    }

    /// Log a failed login attempt for `username`.
    pub fn log_failed_login(&self, ctx: &RequestContext, username: &str) -> bool {
        let now = now();
        let line = LogLineBuilder::new(now, &ctx.extract()).failed_login_line(username);
        self.emit(LogCategory::Login, now, &line)
    }

    // -------------------------------------------------------------------------
    // Handler callbacks
    // -------------------------------------------------------------------------

    /// Error callback.
    ///
    /// Returns `true` without logging while the error-reporting level is
    /// zero; otherwise logs the error with the current stack trace (minus
    /// this call) and returns whether the write succeeded.
    #[inline(never)]
    pub fn on_error(
        &self,
        ctx: &RequestContext,
        code: i64,
        message: &str,
        file: &str,
        line: u32,
    ) -> bool {
        if self.error_reporting() == 0 {
            return true;
        }

        let frames = frames_from_backtrace(&Backtrace::force_capture());
        self.report(ctx, ErrorEvent::new(code, message, file, line), frames)
    }

    /// [`on_error`](Self::on_error) with frames captured by the caller.
    ///
    /// The first frame is the capturing function itself and is dropped, so
    /// the trace starts at whoever called it.
    pub fn on_error_with_frames(
        &self,
        ctx: &RequestContext,
        event: ErrorEvent,
        frames: Vec<String>,
    ) -> bool {
        if self.error_reporting() == 0 {
            return true;
        }
        self.report(ctx, event, frames)
    }

    /// Log a fatal error with the given raw frames, the first of which is
    /// the handler frame and is dropped.
    ///
    /// If the line cannot be written the error is kept for [`on_shutdown`](Self::on_shutdown).
    pub fn report_fatal(
        &self,
        ctx: &RequestContext,
        event: ErrorEvent,
        frames: Vec<String>,
    ) -> bool {
        let written = self.report(ctx, event.clone(), frames);
        if !written {
            self.record_fatal(event);
        }
        written
    }

    /// Keep `event` as the last fatal error, logged by [`on_shutdown`](Self::on_shutdown).
    pub fn record_fatal(&self, event: ErrorEvent) {
        // never block on a lock a panicking thread may hold
        if let Some(mut slot) = self.last_fatal.try_lock() {
            *slot = Some(event);
        }
    }

    /// The recorded fatal error, if any.
    pub fn last_fatal(&self) -> Option<ErrorEvent> {
        self.last_fatal.try_lock().and_then(|slot| slot.clone())
    }

    /// Shutdown callback: logs the last fatal error, if one was recorded.
    ///
    /// The message goes below the line, one tab-indented line per message
    /// line, and the message field itself stays empty.
    pub fn on_shutdown(&self, ctx: &RequestContext) {
        let Some(fatal) = self.last_fatal.try_lock().and_then(|mut slot| slot.take()) else {
            return;
        };

        let mut extra: Vec<String> = fatal.message.lines().map(|l| format!("\t{}", l)).collect();
        if !fatal.extra.is_empty() {
            extra.push(fatal.extra.clone());
        }

        let event =
            ErrorEvent::new(fatal.code, "", fatal.file, fatal.line).with_extra(extra.join("\n"));
        if !self.log_errors(ctx, &event) {
            debug!("[ErrorLogger] Last fatal error could not be written at shutdown");
        }
    }

    fn report(&self, ctx: &RequestContext, event: ErrorEvent, frames: Vec<String>) -> bool {
        let node = ErrorNode::new("", &event.message, &event.file, event.line).with_frames(frames);
        match flatten_trace(&node, true) {
            Ok(trace) => self.log_errors(ctx, &event.with_trace(&trace)),
            Err(e) => {
                error!("[ErrorLogger] {}", e);
                false
            }
        }
    }

    fn emit(&self, category: LogCategory, timestamp: DateTime<FixedOffset>, line: &str) -> bool {
        if self.config.print_errors {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(line.as_bytes());
            let _ = stdout.flush();
        }
        self.writer.write(category, timestamp.date_naive(), line)
    }
}

fn now() -> DateTime<FixedOffset> {
    Local::now().into()
}

/// Restores the previous error-reporting level on drop.
pub struct SilenceGuard<'a> {
    logger: &'a ErrorLogger,
    previous: i64,
}

impl Drop for SilenceGuard<'_> {
    fn drop(&mut self) {
        self.logger.set_error_reporting(self.previous);
    }
}
