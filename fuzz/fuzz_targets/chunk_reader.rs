#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use peekchunk::{CancelToken, ChunkReader, ReaderConfig, with_chunk_size, with_peek_size};

fuzz_target!(|data: Vec<u8>| {
    // First two bytes pick the sizes, the rest is the stream.
    let (chunk, peek, body) = match data.as_slice() {
        [c, p, rest @ ..] => (usize::from(*c) + 1, usize::from(*p), rest.to_vec()),
        _ => return,
    };

    let configs = vec![
        ReaderConfig::from_options([with_chunk_size(chunk), with_peek_size(peek)]),
        ReaderConfig::from_options([with_chunk_size(chunk), with_peek_size(0)]),
        ReaderConfig::default(),
    ];

    for config in configs {
        let reader = ChunkReader::with_config(config).unwrap();
        let results: Vec<_> = reader
            .read(&CancelToken::new(), Cursor::new(body.clone()))
            .collect();

        let c = config.chunk_size();
        let p = config.peek_size();

        // Verify: one chunk per started core
        assert_eq!(results.len(), body.len().div_ceil(c));

        // Verify: every chunk is the expected window of the input
        for (i, result) in results.iter().enumerate() {
            assert!(result.error().is_none());
            assert!(!result.is_empty());
            let start = i * c;
            let end = (start + c + p).min(body.len());
            assert_eq!(result.bytes(), &body[start..end]);

            if result.len() < config.small_chunk_threshold() {
                assert_eq!(result.capacity(), result.len());
            }
        }

        // Verify: cores plus the final chunk rebuild the input
        if let Some((last, rest)) = results.split_last() {
            let mut rebuilt: Vec<u8> = rest.iter().flat_map(|r| r.bytes()[..c].to_vec()).collect();
            rebuilt.extend_from_slice(last.bytes());
            assert_eq!(rebuilt, body);
        }
    }
});
