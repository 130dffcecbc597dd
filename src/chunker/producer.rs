//! The background loop that turns a byte source into overlapping chunks.

use std::io::Read;

use crossbeam_channel::{Sender, select};

use crate::cancel::CancelToken;
use crate::chunk::ChunkResult;
use crate::config::ReaderConfig;
use crate::error::{ChunkError, is_reportable};
use crate::source::PeekReader;

/// Why the producer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exit {
    /// The source ran dry.
    Exhausted,
    /// A reportable error was delivered.
    Failed,
    /// The token was cancelled.
    Cancelled,
    /// The consumer dropped its end of the queue.
    Disconnected,
}

/// Reads `source` chunk by chunk and sends each result on `tx`.
///
/// Each chunk holds up to `chunk_size` consumed bytes followed by up to
/// `peek_size` previewed bytes, which the next chunk reads again. Returns
/// once the source is exhausted or fails, a buffer cannot be allocated, the
/// token is cancelled, or the receiver is gone. Dropping `tx` on return
/// closes the queue.
pub(crate) fn produce<R: Read>(
    config: &ReaderConfig,
    source: R,
    cancel: &CancelToken,
    tx: Sender<ChunkResult>,
) -> Exit {
    let mut source = match PeekReader::try_with_capacity(config.total_size(), source) {
        Ok(source) => source,
        Err(e) => {
            let size = config.total_size();
            tracing::error!(error = %e, size, "failed to allocate lookahead buffer");
            let result = ChunkResult::new(Vec::new(), Some(ChunkError::Alloc { size, source: e }));
            return deliver(&tx, cancel, result).unwrap_or(Exit::Failed);
        }
    };
    let mut emitted = 0usize;

    tracing::debug!(
        chunk_size = config.chunk_size(),
        peek_size = config.peek_size(),
        buffer = source.capacity(),
        "starting chunk producer"
    );

    let exit = loop {
        let mut chunk = Vec::new();
        if let Err(e) = chunk.try_reserve_exact(config.total_size()) {
            let size = config.total_size();
            tracing::error!(error = %e, size, "failed to allocate chunk buffer");
            let result = ChunkResult::new(Vec::new(), Some(ChunkError::Alloc { size, source: e }));
            break deliver(&tx, cancel, result).unwrap_or(Exit::Failed);
        }
        chunk.resize(config.chunk_size(), 0);

        let (n, status) = source.read_full(&mut chunk);

        let data = if n > 0 {
            let peeked = source.peek(config.total_size() - n);
            let len = n + peeked.len();
            if len < config.small_chunk_threshold() {
                let mut compact = Vec::with_capacity(len);
                compact.extend_from_slice(&chunk[..n]);
                compact.extend_from_slice(peeked);
                compact
            } else {
                chunk.truncate(n);
                chunk.extend_from_slice(peeked);
                chunk
            }
        } else {
            Vec::new()
        };

        let (error, last) = match status {
            Ok(()) => (None, false),
            Err(e) if is_reportable(&e) => {
                tracing::error!(error = %e, bytes_read = n, "error reading chunk");
                (Some(ChunkError::Io(e)), true)
            }
            Err(_) => (None, true),
        };

        if error.is_none() && n == 0 {
            break Exit::Exhausted;
        }
        let failed = error.is_some();

        let len = data.len();
        if let Some(exit) = deliver(&tx, cancel, ChunkResult::new(data, error)) {
            break exit;
        }

        tracing::trace!(index = emitted, len, consumed = n, "emitted chunk");
        emitted += 1;

        if last {
            break if failed { Exit::Failed } else { Exit::Exhausted };
        }
    };

    tracing::debug!(
        chunks = emitted,
        exit = ?exit,
        buffered = source.buffered().len(),
        "chunk producer finished"
    );
    exit
}

/// Hands `result` to the consumer, blocking while the queue is full.
///
/// Returns `None` once delivered, or the reason delivery was abandoned.
fn deliver(tx: &Sender<ChunkResult>, cancel: &CancelToken, result: ChunkResult) -> Option<Exit> {
    if cancel.is_cancelled() {
        tracing::debug!("cancelled before delivery, dropping pending chunk");
        return Some(Exit::Cancelled);
    }

    select! {
        send(tx, result) -> res => res.err().map(|_| Exit::Disconnected),
        recv(cancel.signal()) -> _ => {
            tracing::debug!("cancelled while waiting on a full queue, dropping pending chunk");
            Some(Exit::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    use crate::config::{with_chunk_size, with_peek_size};

    fn run(config: ReaderConfig, data: &[u8]) -> (Exit, Vec<ChunkResult>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let exit = produce(&config, Cursor::new(data.to_vec()), &CancelToken::new(), tx);
        (exit, rx.into_iter().collect())
    }

    fn small() -> ReaderConfig {
        ReaderConfig::from_options([with_chunk_size(10), with_peek_size(3)])
    }

    #[test]
    fn test_alphabet_example() {
        let (exit, results) = run(small(), b"abcdefghijklmnopqrstuvwxyz");
        assert_eq!(exit, Exit::Exhausted);

        let chunks: Vec<&[u8]> = results.iter().map(|r| r.bytes()).collect();
        assert_eq!(
            chunks,
            vec![&b"abcdefghijklm"[..], &b"klmnopqrstuvw"[..], &b"uvwxyz"[..]]
        );
        assert!(results.iter().all(|r| !r.is_err()));
    }

    #[test]
    fn test_empty_source_emits_nothing() {
        let (exit, results) = run(small(), b"");
        assert_eq!(exit, Exit::Exhausted);
        assert!(results.is_empty());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_chunk() {
        let data: Vec<u8> = (0..20).collect();
        let (exit, results) = run(small(), &data);
        assert_eq!(exit, Exit::Exhausted);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].bytes(), &data[0..13]);
        assert_eq!(results[1].bytes(), &data[10..20]);
    }

    #[test]
    fn test_large_chunk_reuses_working_buffer() {
        let data = vec![7u8; 100];
        let (_, results) = run(small(), &data);
        // Full chunks keep the total-size working buffer.
        assert_eq!(results[0].len(), 13);
        assert_eq!(results[0].capacity(), 13);

        let config = ReaderConfig::from_options([with_chunk_size(10), with_peek_size(10)]);
        let (_, results) = run(config, &[1u8; 15]);
        // 15 bytes is above half of 20, so the 20-byte buffer is kept as is.
        assert_eq!(results[0].len(), 15);
        assert_eq!(results[0].capacity(), 20);
    }

    #[test]
    fn test_small_chunk_is_tightly_sized() {
        let (_, results) = run(small(), b"abcdef");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 6);
        assert_eq!(results[0].capacity(), 6);
    }

    #[test]
    fn test_cancelled_before_start_sends_nothing() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let cancel = CancelToken::new();
        cancel.cancel();

        let exit = produce(&small(), Cursor::new(vec![1u8; 50]), &cancel, tx);
        assert_eq!(exit, Exit::Cancelled);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_stops_producer() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let exit = produce(&small(), Cursor::new(vec![1u8; 50]), &CancelToken::new(), tx);
        assert_eq!(exit, Exit::Disconnected);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_unallocatable_chunk_is_reported() {
        let config =
            ReaderConfig::from_options([with_chunk_size(usize::MAX / 4), with_peek_size(0)]);
        assert!(config.validate().is_ok());

        let (exit, results) = run(config, b"secret data");
        assert_eq!(exit, Exit::Failed);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
        assert!(matches!(results[0].error(), Some(ChunkError::Alloc { .. })));
    }

    #[test]
    fn test_immediate_failure_yields_empty_error_result() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let exit = produce(&small(), Broken, &CancelToken::new(), tx);
        assert_eq!(exit, Exit::Failed);

        let results: Vec<_> = rx.into_iter().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
        assert_eq!(
            results[0].error().and_then(|e| e.io_kind()),
            Some(io::ErrorKind::PermissionDenied)
        );
    }
}
