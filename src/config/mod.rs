//! Configuration for chunk reading.
//!
//! This module provides the types that size the chunks a reader produces:
//!
//! - [`ReaderConfig`] - Resolved chunk, peek and derived sizes
//! - [`ConfigOption`] - A single override applied on top of the defaults
//!
//! # Example
//!
//! ```
//! use peekchunk::{ReaderConfig, with_chunk_size, with_peek_size};
//!
//! // Option list, applied in order
//! let config = ReaderConfig::from_options([with_chunk_size(4096), with_peek_size(512)]);
//! assert_eq!(config.total_size(), 4608);
//!
//! // Builder methods
//! let config = ReaderConfig::default().with_chunk_size(4096).with_peek_size(512);
//! assert_eq!(config.total_size(), 4608);
//! # Ok::<(), peekchunk::ChunkError>(())
//! ```

use crate::error::ChunkError;

/// Default chunk size (10 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024;

/// Default peek size (3 KiB).
pub const DEFAULT_PEEK_SIZE: usize = 3 * 1024;

/// Default size of a chunk including its peek window.
pub const DEFAULT_TOTAL_CHUNK_SIZE: usize = DEFAULT_CHUNK_SIZE + DEFAULT_PEEK_SIZE;

/// Fraction of the total chunk size below which a chunk is stored in a
/// tightly sized buffer instead of the working buffer.
pub const SMALL_CHUNK_THRESHOLD_RATIO: f64 = 0.5;

/// Largest accepted `chunk_size + peek_size`.
pub const MAX_TOTAL_CHUNK_SIZE: usize = isize::MAX as usize;

/// Default number of results the queue holds before the producer blocks.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A single configuration override.
///
/// Options are applied in order on top of the defaults; when the same field
/// is set twice the last value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigOption {
    /// Number of bytes each chunk advances the stream by.
    ChunkSize(usize),
    /// Number of upcoming bytes appended to each chunk.
    PeekSize(usize),
    /// Capacity of the result queue.
    ChannelCapacity(usize),
}

/// Sets the chunk size.
pub fn with_chunk_size(size: usize) -> ConfigOption {
    ConfigOption::ChunkSize(size)
}

/// Sets the peek size.
pub fn with_peek_size(size: usize) -> ConfigOption {
    ConfigOption::PeekSize(size)
}

/// Sets the result queue capacity.
pub fn with_channel_capacity(capacity: usize) -> ConfigOption {
    ConfigOption::ChannelCapacity(capacity)
}

/// Resolved configuration for a chunk reader.
///
/// `total_size` and `small_chunk_threshold` are derived from the chunk and
/// peek sizes and are recomputed by every setter, so
/// `total_size() == chunk_size() + peek_size()` always holds.
///
/// # Example
///
/// ```
/// use peekchunk::ReaderConfig;
///
/// let config = ReaderConfig::default();
/// assert_eq!(config.chunk_size(), 10 * 1024);
/// assert_eq!(config.peek_size(), 3 * 1024);
/// assert_eq!(config.small_chunk_threshold(), config.total_size() / 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReaderConfig {
    /// Bytes consumed from the source per chunk.
    chunk_size: usize,

    /// Bytes previewed past the end of each chunk.
    peek_size: usize,

    /// `chunk_size + peek_size`.
    total_size: usize,

    /// Chunks shorter than this are copied into an exact-size buffer.
    small_chunk_threshold: usize,

    channel_capacity: usize,
}

impl ReaderConfig {
    /// Builds a configuration by applying `options` over the defaults.
    ///
    /// No validation happens here; see [`ReaderConfig::validate`].
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        options
            .into_iter()
            .fold(Self::default(), |config, option| config.apply(option))
    }

    /// Applies a single option.
    pub fn apply(self, option: ConfigOption) -> Self {
        match option {
            ConfigOption::ChunkSize(size) => self.with_chunk_size(size),
            ConfigOption::PeekSize(size) => self.with_peek_size(size),
            ConfigOption::ChannelCapacity(capacity) => self.with_channel_capacity(capacity),
        }
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self.recompute()
    }

    /// Sets the peek size.
    pub fn with_peek_size(mut self, size: usize) -> Self {
        self.peek_size = size;
        self.recompute()
    }

    /// Sets the result queue capacity. Zero makes every hand-off a rendezvous.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the peek size.
    pub fn peek_size(&self) -> usize {
        self.peek_size
    }

    /// Returns the chunk size plus the peek size.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Returns the small-chunk threshold.
    ///
    /// A chunk whose length is strictly below this value is considered small.
    pub fn small_chunk_threshold(&self) -> usize {
        self.small_chunk_threshold
    }

    /// Returns the result queue capacity.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Validates the current configuration.
    ///
    /// The chunk size must be non-zero and the total size must not exceed
    /// [`MAX_TOTAL_CHUNK_SIZE`], the largest buffer Rust can allocate. A zero
    /// peek size is allowed and disables overlap.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "chunk_size must be non-zero",
            });
        }

        match self.chunk_size.checked_add(self.peek_size) {
            None => {
                return Err(ChunkError::InvalidConfig {
                    message: "chunk_size + peek_size overflows usize",
                });
            }
            Some(total) if total > MAX_TOTAL_CHUNK_SIZE => {
                return Err(ChunkError::InvalidConfig {
                    message: "chunk_size + peek_size exceeds isize::MAX",
                });
            }
            Some(_) => {}
        }

        Ok(())
    }

    fn recompute(mut self) -> Self {
        self.total_size = self.chunk_size.saturating_add(self.peek_size);
        self.small_chunk_threshold = small_chunk_threshold(self.total_size);
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            peek_size: DEFAULT_PEEK_SIZE,
            total_size: DEFAULT_TOTAL_CHUNK_SIZE,
            small_chunk_threshold: small_chunk_threshold(DEFAULT_TOTAL_CHUNK_SIZE),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

// Half of the total, rounded up, so that `len < threshold` matches
// `len < total * SMALL_CHUNK_THRESHOLD_RATIO` exactly.
fn small_chunk_threshold(total_size: usize) -> usize {
    total_size.div_ceil(2)
}
