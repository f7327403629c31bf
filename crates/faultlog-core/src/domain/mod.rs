//! Domain types
//!
//! This module contains the value types flowing through the logger:
//! - Error data (ErrorEvent, Severity, the Throwable chain and its frames)
//! - Request data (RequestContext, ExtractedContext)
//! - Storage addressing (LogCategory, LogTarget)
//! - Configuration (LoggerConfig)

mod chain;
pub mod config;
pub mod context;
mod event;
mod frame;
mod severity;
mod target;

pub use chain::{ErrorNode, Throwable, SOURCE_TYPE, UNKNOWN_FILE};
pub use config::{LoggerConfig, REPORT_ALL};
pub use context::{ExtractedContext, RequestContext};
pub use event::ErrorEvent;
pub use frame::{frames_from_backtrace, parse_backtrace, FrameDescriptor};
pub use severity::{translate, Severity};
pub use target::{LogCategory, LogTarget};
