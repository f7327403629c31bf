//! Services
//!
//! Rendering, writing and the public logging operations built on top of them.

mod error_logger;
mod line_builder;
mod log_writer;
mod trace_flattener;

pub use error_logger::{ErrorLogger, SilenceGuard};
pub use line_builder::{LogLineBuilder, ERROR_PREFIX};
pub use log_writer::{append_line, LogWriter, DIR_MODE};
pub use trace_flattener::{flatten_trace, renumber_frames, MAX_CHAIN_DEPTH};
