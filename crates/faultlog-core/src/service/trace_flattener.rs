//! Trace flattener - renders a cause chain as one indented frame listing
//!
//! ```text
//! #0 app::handler at src/handler.rs:12:5        <- root frames (no header)
//! #1 main
//!   cache miss in src/cache.rs:40 (CacheError)   <- cause, level 1
//!   #0 app::cache::load
//!     disk full in [unknown]:0 (io::Error)       <- cause, level 2
//! ```

use std::collections::HashSet;

use crate::domain::{FrameDescriptor, Throwable};
use crate::error::TraceError;

/// Maximum number of chain nodes walked before giving up.
pub const MAX_CHAIN_DEPTH: usize = 256;

/// Indentation unit per cause level
const INDENT: &str = "  ";

/// Flatten `head` and all of its causes into trace lines, deepest cause last.
///
/// With `suppress_first_frame` the first frame of the root is dropped;
/// it is the call into the error handler, not user code.
pub fn flatten_trace(
    head: &dyn Throwable,
    suppress_first_frame: bool,
) -> Result<Vec<String>, TraceError> {
    let mut lines = Vec::new();
    let mut seen: HashSet<*const (dyn Throwable + '_)> = HashSet::new();
    let mut current = Some(head);
    let mut level = 0usize;

    while let Some(node) = current {
        if level >= MAX_CHAIN_DEPTH {
            return Err(TraceError::ChainTooDeep {
                max: MAX_CHAIN_DEPTH,
            });
        }
        // address plus vtable: a cause stored at offset 0 of its parent is not the parent
        if !seen.insert(identity(node)) {
            return Err(TraceError::CyclicCauseChain { depth: level });
        }

        let indent = INDENT.repeat(level);
        if level != 0 {
            lines.push(format!(
                "{}{} in {}:{} ({})",
                indent,
                node.message(),
                node.file(),
                node.line(),
                node.type_name()
            ));
        }

        let skip = usize::from(suppress_first_frame && level == 0);
        lines.extend(
            renumber_frames(node.frames(), skip)
                .iter()
                .map(|frame| frame.render(&indent)),
        );

        current = node.previous();
        level += 1;
    }

    Ok(lines)
}

/// Drop `skip` leading frames and index the rest from 0.
pub fn renumber_frames(frames: &[String], skip: usize) -> Vec<FrameDescriptor> {
    frames
        .iter()
        .skip(skip)
        .enumerate()
        .map(|(i, raw)| FrameDescriptor::renumber(i, raw))
        .collect()
}

fn identity<'a>(node: &'a dyn Throwable) -> *const (dyn Throwable + 'a) {
    node
}
