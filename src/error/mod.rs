//! Error types for peekchunk.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors that can occur while configuring or running a chunk reader.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A chunk or lookahead buffer could not be allocated.
    #[error("failed to allocate {size} bytes: {source}")]
    Alloc {
        /// Number of bytes requested.
        size: usize,
        /// The allocator's refusal.
        #[source]
        source: TryReserveError,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl ChunkError {
    /// Returns the underlying I/O error kind, if this is an I/O error.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ChunkError::Io(e) => Some(e.kind()),
            ChunkError::Alloc { .. } | ChunkError::InvalidConfig { .. } => None,
        }
    }
}

/// Reports whether a read error should be surfaced to the consumer.
///
/// A stream that runs dry, whether before any byte was read or part way
/// through a chunk, ends production quietly. Anything else is a failure.
pub(crate) fn is_reportable(err: &io::Error) -> bool {
    err.kind() != io::ErrorKind::UnexpectedEof
}
