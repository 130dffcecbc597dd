//! Cancellation signal shared between a consumer and its producer.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

/// A cloneable, thread-safe cancellation token.
///
/// Cancelling sets a flag that can be polled with
/// [`is_cancelled`](CancelToken::is_cancelled) and disconnects an internal
/// channel, which wakes a producer blocked on a full result queue.
/// Cancellation is permanent and idempotent.
///
/// # Example
///
/// ```
/// use peekchunk::CancelToken;
///
/// let token = CancelToken::new();
/// let observer = token.clone();
///
/// assert!(!observer.is_cancelled());
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
    signal: Receiver<()>,
}

struct Inner {
    cancelled: AtomicBool,
    // Dropped on cancel; never sent on.
    trigger: Mutex<Option<Sender<()>>>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
            }),
            signal,
        }
    }

    /// Cancels the token and every clone of it.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let trigger = match self.inner.trigger.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(trigger);
    }

    /// Returns true once [`cancel`](CancelToken::cancel) has been called on
    /// this token or any clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// A receiver that becomes ready (disconnected) when the token is cancelled.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
