//! Stack frames
//!
//! Raw frames are plain strings of the form `"#<n> <description>"`,
//! the same shape the flattened trace is rendered in.

use std::backtrace::{Backtrace, BacktraceStatus};

/// One renumbered frame of a chain segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Sequential index within the segment, starting at 0
    pub index: usize,
    /// Frame text after its original index token, including the leading space
    pub rendered: String,
}

impl FrameDescriptor {
    /// Re-index a raw frame, dropping whatever index it carried.
    pub fn renumber(index: usize, raw: &str) -> Self {
        let rendered = match raw.find(' ') {
            Some(pos) => raw[pos..].to_string(),
            None => format!(" {}", raw),
        };
        Self { index, rendered }
    }

    pub fn render(&self, indent: &str) -> String {
        format!("{}#{}{}", indent, self.index, self.rendered)
    }
}

/// Symbols of the capture machinery itself, never part of a useful trace.
const CAPTURE_PREFIXES: &[&str] = &["std::backtrace", "backtrace::", "<std::backtrace"];

/// Convert a captured std backtrace into raw frame strings.
///
/// Returns no frames when backtraces are disabled or unsupported.
pub fn frames_from_backtrace(backtrace: &Backtrace) -> Vec<String> {
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    parse_backtrace(&backtrace.to_string())
}

/// Parse the textual form of a std backtrace:
///
/// ```text
///    0: crate::module::function
///              at ./src/module.rs:10:5
///    1: main
/// ```
pub fn parse_backtrace(text: &str) -> Vec<String> {
    let mut frames: Vec<(String, Option<String>)> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                if last.1.is_none() {
                    last.1 = Some(location.trim().to_string());
                }
            }
            continue;
        }

        let Some((index, symbol)) = trimmed.split_once(": ") else {
            continue;
        };
        if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
            frames.push((symbol.trim().to_string(), None));
        }
    }

    frames
        .into_iter()
        .skip_while(|(symbol, _)| CAPTURE_PREFIXES.iter().any(|p| symbol.starts_with(p)))
        .enumerate()
        .map(|(i, (symbol, location))| match location {
            Some(location) => format!("#{} {} at {}", i, symbol, location),
            None => format!("#{} {}", i, symbol),
        })
        .collect()
}
