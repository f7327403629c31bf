//! Cause chains
//!
//! A `Throwable` is one error in a singly-linked chain of causes.
//! `ErrorNode` is the owned implementation; host error types may
//! implement the trait directly.

use std::backtrace::Backtrace;
use std::error::Error;
use std::panic::Location;

use super::frame::frames_from_backtrace;
use crate::service::MAX_CHAIN_DEPTH;

/// File reported for causes whose origin is unknown.
pub const UNKNOWN_FILE: &str = "[unknown]";

/// Type reported for causes reached through `Error::source()`.
pub const SOURCE_TYPE: &str = "std::error::Error";

/// One error of a cause chain.
pub trait Throwable {
    fn message(&self) -> &str;

    fn file(&self) -> &str;

    fn line(&self) -> u32;

    /// Name of the concrete error type, shown in cause headers
    fn type_name(&self) -> &str;

    /// Severity code logged for this error
    fn code(&self) -> i64 {
        0
    }

    /// Raw frames, most recent call first
    fn frames(&self) -> &[String];

    /// The error that caused this one
    fn previous(&self) -> Option<&dyn Throwable>;
}

/// Owned cause chain node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub type_name: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub code: i64,
    pub frames: Vec<String>,
    pub previous: Option<Box<ErrorNode>>,
}

impl ErrorNode {
    pub fn new(
        type_name: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            file: file.into(),
            line,
            code: 0,
            frames: Vec::new(),
            previous: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<i64>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames = frames.into_iter().map(Into::into).collect();
        self
    }

    /// Attach the backtrace captured at this point (honours `RUST_BACKTRACE`).
    pub fn with_captured_frames(mut self) -> Self {
        self.frames = frames_from_backtrace(&Backtrace::capture());
        self
    }

    pub fn with_previous(mut self, previous: ErrorNode) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Number of nodes in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.previous.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.previous.as_deref();
        }
        depth
    }

    /// Build a chain from an error and its `source()` chain.
    ///
    /// The root is located at the caller and gets the current backtrace;
    /// sources have no location or frames.
    #[track_caller]
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        let mut node = Self::located(std::any::type_name::<E>(), err.to_string());
        node.previous = err.source().and_then(Self::from_sources);
        node.with_captured_frames()
    }

    /// Same as [`from_error`](Self::from_error) for a type-erased error.
    #[track_caller]
    pub fn from_dyn_error(err: &(dyn Error + 'static)) -> Self {
        let mut node = Self::located(SOURCE_TYPE, err.to_string());
        node.previous = err.source().and_then(Self::from_sources);
        node.with_captured_frames()
    }

    /// Build a chain from an `anyhow::Error`, one node per context layer.
    #[track_caller]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut layers = err.chain();
        let root = layers.next().map(|e| e.to_string()).unwrap_or_default();
        let mut node = Self::located("anyhow::Error", root);

        let causes: Vec<ErrorNode> = layers
            .take(MAX_CHAIN_DEPTH)
            .map(|e| Self::new(SOURCE_TYPE, e.to_string(), UNKNOWN_FILE, 0))
            .collect();
        node.previous = link(causes);
        node.with_captured_frames()
    }

    #[track_caller]
    fn located(type_name: &str, message: String) -> Self {
        let location = Location::caller();
        Self::new(type_name, message, location.file(), location.line())
    }

    fn from_sources(err: &(dyn Error + 'static)) -> Option<Box<Self>> {
        let mut causes = Vec::new();
        let mut current = Some(err);
        // a misbehaving `source()` may loop, cap it like the flattener does
        while let Some(e) = current {
            if causes.len() >= MAX_CHAIN_DEPTH {
                break;
            }
            causes.push(Self::new(SOURCE_TYPE, e.to_string(), UNKNOWN_FILE, 0));
            current = e.source();
        }
        link(causes)
    }
}

/// Link nodes so that each one is caused by the next.
fn link(nodes: Vec<ErrorNode>) -> Option<Box<ErrorNode>> {
    nodes.into_iter().rev().fold(None, |previous, mut node| {
        node.previous = previous;
        Some(Box::new(node))
    })
}

impl Throwable for ErrorNode {
    fn message(&self) -> &str {
        &self.message
    }

    fn file(&self) -> &str {
        &self.file
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn code(&self) -> i64 {
        self.code
    }

    fn frames(&self) -> &[String] {
        &self.frames
    }

    fn previous(&self) -> Option<&dyn Throwable> {
        self.previous.as_deref().map(|p| p as &dyn Throwable)
    }
}
