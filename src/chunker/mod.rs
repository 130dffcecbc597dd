//! Chunk production.
//!
//! - [`ChunkReader`] - Reusable reader configured once, run many times
//! - [`ChunkResults`] - Bounded queue of results for one run

mod producer;
mod reader;

pub use reader::{ChunkReader, ChunkResults};
