//! Byte-source adapters.
//!
//! This module wraps the caller's reader so the producer can preview the
//! bytes following a chunk without taking them off the stream. It is an
//! implementation detail and not part of the public API.

mod peek;

pub(crate) use peek::PeekReader;
