//! ChunkReader and ChunkResults - the public chunking API.
//!
//! - [`ChunkReader`] - Reusable, configured entry point
//! - [`ChunkResults`] - The read side of one run's bounded result queue
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use peekchunk::{CancelToken, ChunkReader, with_chunk_size, with_peek_size};
//!
//! let reader = ChunkReader::new([with_chunk_size(10), with_peek_size(3)])?;
//! let cancel = CancelToken::new();
//!
//! let chunks: Vec<_> = reader
//!     .read(&cancel, Cursor::new(b"abcdefghijklmnopqrstuvwxyz".to_vec()))
//!     .map(|r| r.into_result())
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(&chunks[0][..], b"abcdefghijklm");
//! assert_eq!(&chunks[1][..], b"klmnopqrstuvw");
//! assert_eq!(&chunks[2][..], b"uvwxyz");
//! # Ok::<(), peekchunk::ChunkError>(())
//! ```

use std::io::{self, Read};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, RecvError, TryRecvError};

use crate::cancel::CancelToken;
use crate::chunk::ChunkResult;
use crate::config::{ConfigOption, ReaderConfig};
use crate::error::ChunkError;

use super::producer::{self, Exit};

/// A reusable reader that splits byte streams into overlapping chunks.
///
/// A `ChunkReader` is built once from a set of options and can be used for
/// any number of reads, including concurrently from several threads. Each
/// call to [`read`](ChunkReader::read) starts one background producer that
/// owns the source for the duration of the run.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use peekchunk::{CancelToken, ChunkReader};
///
/// let reader = ChunkReader::default();
/// let cancel = CancelToken::new();
///
/// let total: usize = reader
///     .read(&cancel, Cursor::new(vec![0u8; 50_000]))
///     .map(|result| result.len())
///     .sum();
/// assert!(total >= 50_000);
/// ```
#[derive(Debug, Clone)]
pub struct ChunkReader {
    config: Arc<ReaderConfig>,
}

impl ChunkReader {
    /// Creates a reader from a list of options applied over the defaults.
    ///
    /// Returns an error if the resulting configuration is invalid, such as a
    /// zero chunk size.
    ///
    /// # Example
    ///
    /// ```
    /// use peekchunk::{ChunkReader, with_chunk_size};
    ///
    /// assert!(ChunkReader::new([with_chunk_size(4096)]).is_ok());
    /// assert!(ChunkReader::new([with_chunk_size(0)]).is_err());
    /// ```
    pub fn new<I>(options: I) -> Result<Self, ChunkError>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        Self::with_config(ReaderConfig::from_options(options))
    }

    /// Creates a reader from a resolved configuration.
    pub fn with_config(config: ReaderConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Returns the reader's configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Starts chunking `source` on a background thread.
    ///
    /// Results arrive in source order on the returned queue, which closes
    /// when the source is exhausted, a read fails (the failing result is
    /// delivered first), or `cancel` fires. The producer blocks while the
    /// queue is full. Events it logs go to the `tracing` dispatcher that is
    /// current when `read` is called.
    pub fn read<R>(&self, cancel: &CancelToken, source: R) -> ChunkResults
    where
        R: Read + Send + 'static,
    {
        self.start(cancel, source, |job| {
            thread::Builder::new()
                .name("peekchunk-producer".into())
                .spawn(job)
                .map(drop)
        })
    }

    fn start<R, S>(&self, cancel: &CancelToken, source: R, spawn: S) -> ChunkResults
    where
        R: Read + Send + 'static,
        S: FnOnce(Box<dyn FnOnce() + Send>) -> io::Result<()>,
    {
        let (tx, rx) = crossbeam_channel::bounded(self.config.channel_capacity());
        let config = Arc::clone(&self.config);
        let producer_cancel = cancel.clone();
        let dispatch = tracing::dispatcher::get_default(|dispatch| dispatch.clone());

        let job = Box::new(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                let exit = producer::produce(&config, source, &producer_cancel, tx);
                if exit == Exit::Disconnected {
                    tracing::debug!("chunk results dropped before the run finished");
                }
            });
        });

        let rx = match spawn(job) {
            Ok(()) => rx,
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn chunk producer");
                // The job and its sender are gone; report the failure on a
                // queue of its own so it is delivered at any capacity.
                let (tx, rx) = crossbeam_channel::bounded(1);
                let _ = tx.try_send(ChunkResult::new(Vec::new(), Some(ChunkError::Io(e))));
                rx
            }
        };

        ChunkResults {
            rx,
            cancel: cancel.clone(),
        }
    }
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self {
            config: Arc::new(ReaderConfig::default()),
        }
    }
}

/// The consumer side of one chunking run.
///
/// Iterating yields results until the producer closes the queue. Once the
/// run's [`CancelToken`] is cancelled no further results are yielded, even
/// if some were already queued. Dropping `ChunkResults` early stops the
/// producer at its next delivery attempt.
#[derive(Debug)]
pub struct ChunkResults {
    rx: Receiver<ChunkResult>,
    cancel: CancelToken,
}

impl ChunkResults {
    /// Blocks until the next result is available.
    ///
    /// Returns `None` once the queue is closed and drained, or the run has
    /// been cancelled.
    pub fn recv(&self) -> Option<ChunkResult> {
        if self.cancel.is_cancelled() {
            return None;
        }
        match self.rx.recv() {
            Ok(result) if !self.cancel.is_cancelled() => Some(result),
            Ok(_) | Err(RecvError) => None,
        }
    }

    /// Returns the next result if one is already queued.
    pub fn try_recv(&self) -> Result<ChunkResult, TryRecvError> {
        if self.cancel.is_cancelled() {
            return Err(TryRecvError::Disconnected);
        }
        self.rx.try_recv()
    }

    /// Returns the number of results waiting in the queue.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if the run's token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Iterator for ChunkResults {
    type Item = ChunkResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
