//! # Faultlog Core Library
//!
//! Error events, trace flattening and log line rendering for Faultlog.
//!
//! ## Modules
//!
//! - `domain` - Core types (ErrorEvent, Severity, RequestContext, ErrorNode, LoggerConfig)
//! - `service` - Trace flattening, line building, log file writing and the ErrorLogger
//! - `error` - Typed errors for the internal fallible steps

pub mod domain;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::*;
pub use service::*;
