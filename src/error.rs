//! Error types for labelkit.

use std::fmt;

/// Result type alias for labelkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for labelkit operations.
#[derive(Debug)]
pub enum Error {
    /// Cache `put` on an occupied index without requesting replacement.
    ///
    /// Signals a sequencing fault in the draw pipeline: the pass is aborted,
    /// but the cache remains valid for the next pass after `reset()`.
    CacheOverwrite { index: usize },
    /// Operation on a render handle that has already been disposed.
    DisposedHandle,
    /// Invalid color format (e.g., malformed hex directive).
    InvalidColor(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheOverwrite { index } => {
                write!(f, "cache index {index} already occupied (replace not set)")
            }
            Self::DisposedHandle => write!(f, "render handle already disposed"),
            Self::InvalidColor(s) => write!(f, "invalid color format: {s}"),
        }
    }
}

impl std::error::Error for Error {}
