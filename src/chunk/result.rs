//! The ChunkResult type - one unit of output from a chunk reader.

use bytes::Bytes;
use std::fmt;

use crate::error::ChunkError;

/// One chunk delivered by a [`ChunkReader`](crate::ChunkReader).
///
/// A result holds the chunk's bytes (its own data followed by the peek
/// window) and, for the last result of a failed read, the error that ended
/// production. A result is never both empty and error-free.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use peekchunk::{CancelToken, ChunkReader};
///
/// let reader = ChunkReader::default();
/// for result in reader.read(&CancelToken::new(), Cursor::new(b"hello world".to_vec())) {
///     if let Some(err) = result.error() {
///         eprintln!("read failed: {err}");
///     }
///     assert_eq!(result.bytes(), b"hello world");
/// }
/// ```
#[derive(Debug)]
pub struct ChunkResult {
    data: Vec<u8>,
    error: Option<ChunkError>,
}

impl ChunkResult {
    pub(crate) fn new(data: Vec<u8>, error: Option<ChunkError>) -> Self {
        Self { data, error }
    }

    /// Returns the chunk data.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the error that ended production, if any.
    pub fn error(&self) -> Option<&ChunkError> {
        self.error.as_ref()
    }

    /// Returns true if this result carries an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the capacity of the buffer backing the chunk data.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Consumes the result and returns the data, dropping any error.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.data)
    }

    /// Splits the result into (data, error).
    pub fn into_parts(self) -> (Bytes, Option<ChunkError>) {
        (Bytes::from(self.data), self.error)
    }

    /// Converts into a `Result`, discarding partial data if an error is set.
    pub fn into_result(self) -> Result<Bytes, ChunkError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Bytes::from(self.data)),
        }
    }
}

impl fmt::Display for ChunkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkResult({} bytes", self.len())?;
        if let Some(err) = &self.error {
            write!(f, ", error={}", err)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn failed(data: &[u8]) -> ChunkResult {
        ChunkResult::new(data.to_vec(), Some(io::Error::other("boom").into()))
    }

    #[test]
    fn test_ok_result() {
        let result = ChunkResult::new(b"hello".to_vec(), None);
        assert_eq!(result.len(), 5);
        assert!(!result.is_empty());
        assert!(!result.is_err());
        assert_eq!(result.bytes(), b"hello");
    }

    #[test]
    fn test_error_result_keeps_partial_data() {
        let result = failed(b"part");
        assert!(result.is_err());
        let (data, err) = result.into_parts();
        assert_eq!(&data[..], b"part");
        assert_eq!(err.and_then(|e| e.io_kind()), Some(io::ErrorKind::Other));
    }

    #[test]
    fn test_into_result() {
        let ok = ChunkResult::new(b"abc".to_vec(), None).into_result().unwrap();
        assert_eq!(&ok[..], b"abc");

        assert!(failed(b"abc").into_result().is_err());
    }

    #[test]
    fn test_into_bytes_drops_error() {
        assert_eq!(&failed(b"xy").into_bytes()[..], b"xy");
    }

    #[test]
    fn test_capacity_reflects_buffer() {
        let mut data = Vec::with_capacity(32);
        data.extend_from_slice(b"abc");
        let result = ChunkResult::new(data, None);
        assert_eq!(result.len(), 3);
        assert_eq!(result.capacity(), 32);
    }

    #[test]
    fn test_display() {
        let result = ChunkResult::new(b"hello".to_vec(), None);
        assert_eq!(result.to_string(), "ChunkResult(5 bytes)");

        let s = failed(b"").to_string();
        assert!(s.contains("0 bytes"));
        assert!(s.contains("error=io error: boom"));
    }
}
