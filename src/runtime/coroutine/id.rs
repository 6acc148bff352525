//! Coroutine identity
//!
//! Every coroutine receives a process-unique identifier when it is built.
//! The manager keys its registry by this identifier.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Unique coroutine identifier.
///
/// IDs are only allocated by the crate, so one cannot be built to alias a
/// registered coroutine:
///
/// ```compile_fail
/// let forged = tickflow::CoroutineId(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoroutineId(usize);

impl CoroutineId {
    /// Allocate the next identifier.
    #[inline]
    pub(crate) fn next() -> Self {
        CoroutineId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the inner value.
    #[inline]
    pub fn inner(&self) -> usize {
        self.0
    }
}

impl From<CoroutineId> for usize {
    fn from(val: CoroutineId) -> Self {
        val.0
    }
}

impl fmt::Display for CoroutineId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Coroutine({})", self.0)
    }
}
