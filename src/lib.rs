//! peekchunk
//!
//! Overlapping stream chunking for Rust.
//!
//! `peekchunk` splits a byte stream into bounded chunks for pattern scanners
//! (secret detectors, token matchers) that must not miss a match straddling
//! a chunk boundary. Every chunk carries a *peek window*: the first bytes of
//! the next chunk, previewed without being consumed, so consecutive chunks
//! overlap by the peek size.
//!
//! The crate intentionally:
//! - does NOT parse or scan chunk contents
//! - does NOT deduplicate the overlap for the consumer
//! - does NOT persist chunks
//! - does NOT retry failed reads
//!
//! It only does one thing: **Read bytes → queue overlapping chunks**
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use peekchunk::{CancelToken, ChunkError, ChunkReader};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("data.bin")?;
//!     let reader = ChunkReader::default();
//!     let cancel = CancelToken::new();
//!
//!     for result in reader.read(&cancel, file) {
//!         let chunk = result.into_result()?;
//!         println!("chunk {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Options
//!
//! ```
//! use peekchunk::{ChunkReader, with_chunk_size, with_peek_size};
//!
//! let reader = ChunkReader::new([with_chunk_size(64 * 1024), with_peek_size(512)])?;
//! assert_eq!(reader.config().total_size(), 64 * 1024 + 512);
//! # Ok::<(), peekchunk::ChunkError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod chunk;
mod chunker;
mod config;
mod error;

mod source; // internal lookahead reader

//
// Public surface (intentionally tiny)
//

pub use cancel::CancelToken;
pub use chunk::ChunkResult;
pub use chunker::{ChunkReader, ChunkResults};
pub use config::{
    ConfigOption, DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHUNK_SIZE, DEFAULT_PEEK_SIZE,
    DEFAULT_TOTAL_CHUNK_SIZE, MAX_TOTAL_CHUNK_SIZE, ReaderConfig, SMALL_CHUNK_THRESHOLD_RATIO,
    with_channel_capacity, with_chunk_size, with_peek_size,
};
pub use error::ChunkError;

pub use crossbeam_channel::TryRecvError;
