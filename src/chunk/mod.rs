//! Chunk types.
//!
//! - [`ChunkResult`] - Chunk bytes plus an optional terminal error

mod result;

pub use result::ChunkResult;
