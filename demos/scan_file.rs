//! File scanning example.
//!
//! Searches a file for a byte pattern, one overlapping chunk at a time, and
//! stops reading as soon as the pattern is found.
//!
//! Run with:
//!     RUST_LOG=peekchunk=debug cargo run --example scan_file -- /path/to/file PATTERN

use std::env;
use std::fs::File;

use peekchunk::{CancelToken, ChunkReader, with_chunk_size, with_peek_size};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "Cargo.toml".to_string());
    let pattern = args.next().unwrap_or_else(|| "peekchunk".to_string());
    if pattern.is_empty() {
        return Err("pattern must not be empty".into());
    }

    // The peek window must be at least as long as the pattern for matches
    // across chunk boundaries to be found.
    let reader = ChunkReader::new([
        with_chunk_size(16 * 1024),
        with_peek_size(pattern.len().max(64)),
    ])?;

    println!("Scanning {} for {:?}\n", path, pattern);

    let cancel = CancelToken::new();
    let file = File::open(&path)?;

    let mut chunks = 0;
    let mut found = None;
    for (index, result) in reader.read(&cancel, file).enumerate() {
        chunks += 1;
        let data = result.bytes();

        if let Some(pos) = data
            .windows(pattern.len())
            .position(|w| w == pattern.as_bytes())
        {
            let offset = index * reader.config().chunk_size() + pos;
            found = Some(offset);
            cancel.cancel();
        }

        if let Some(err) = result.error() {
            return Err(err.to_string().into());
        }
    }

    match found {
        Some(offset) => println!("Found at byte {} after {} chunks", offset, chunks),
        None => println!("Not found in {} chunks", chunks),
    }

    Ok(())
}
