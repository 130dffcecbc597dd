//! Property-based tests for ChunkReader.
//!
//! For arbitrary input and sizes:
//! - the chunk count is `ceil(len / chunk_size)`
//! - each chunk's tail past its core reappears at the head of the next chunk
//! - the cores plus the final chunk rebuild the input
//! - small chunks carry no spare capacity

use std::io::Cursor;

use peekchunk::{
    CancelToken, ChunkReader, ChunkResult, with_channel_capacity, with_chunk_size, with_peek_size,
};
use proptest::prelude::*;

fn chunk_all(data: &[u8], chunk: usize, peek: usize, capacity: usize) -> Vec<ChunkResult> {
    let reader = ChunkReader::new([
        with_chunk_size(chunk),
        with_peek_size(peek),
        with_channel_capacity(capacity),
    ])
    .unwrap();
    reader
        .read(&CancelToken::new(), Cursor::new(data.to_vec()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_chunk_count(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk in 1usize..200,
        peek in 0usize..64,
        capacity in 0usize..4,
    ) {
        let results = chunk_all(&data, chunk, peek, capacity);
        prop_assert_eq!(results.len(), data.len().div_ceil(chunk));
        prop_assert!(results.iter().all(|r| !r.is_err() && !r.is_empty()));
    }

    #[test]
    fn prop_overlap(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk in 1usize..200,
        peek in 0usize..64,
    ) {
        let results = chunk_all(&data, chunk, peek, 64);
        for (i, pair) in results.windows(2).enumerate() {
            let (prev, next) = (pair[0].bytes(), pair[1].bytes());
            let tail = &prev[chunk..];
            prop_assert!(tail.len() <= peek);
            prop_assert_eq!(tail, &next[..tail.len()], "chunk {} -> {}", i, i + 1);
        }
    }

    #[test]
    fn prop_round_trip(
        data in proptest::collection::vec(any::<u8>(), 1..2048),
        chunk in 1usize..200,
        peek in 0usize..64,
    ) {
        let results = chunk_all(&data, chunk, peek, 64);
        let (last, rest) = results.split_last().unwrap();

        let mut rebuilt = Vec::with_capacity(data.len());
        for result in rest {
            rebuilt.extend_from_slice(&result.bytes()[..chunk]);
        }
        rebuilt.extend_from_slice(last.bytes());
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn prop_chunk_matches_window(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk in 1usize..200,
        peek in 0usize..64,
    ) {
        let results = chunk_all(&data, chunk, peek, 64);
        for (i, result) in results.iter().enumerate() {
            let start = i * chunk;
            let end = (start + chunk + peek).min(data.len());
            prop_assert_eq!(result.bytes(), &data[start..end]);
        }
    }

    #[test]
    fn prop_small_chunks_are_tight(
        len in 1usize..600,
        chunk in 1usize..200,
        peek in 0usize..64,
    ) {
        let data = vec![0x5Au8; len];
        let threshold = ((chunk + peek) as f64 * 0.5).ceil() as usize;
        for result in chunk_all(&data, chunk, peek, 64) {
            if result.len() < threshold {
                prop_assert_eq!(result.capacity(), result.len());
            }
        }
    }
}
