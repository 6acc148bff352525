//! Coroutine faults
//!
//! The scheduler has no recoverable error states of its own. Everything here
//! originates in application code: a step procedure or a predicate check.

use thiserror::Error;

/// Error raised by application code running inside a coroutine.
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fault surfaced by [`Coroutine::update`](super::Coroutine::update).
///
/// A coroutine that returns one of these is already stopped, along with every
/// coroutine nested beneath it.
#[derive(Debug, Error)]
pub enum CoroutineError {
    /// The step procedure failed while resuming.
    #[error("step procedure faulted: {source}")]
    Procedure {
        #[source]
        source: Fault,
    },

    /// An `Until`/`While` check failed while being evaluated.
    #[error("suspension predicate faulted: {source}")]
    Predicate {
        #[source]
        source: Fault,
    },
}

impl CoroutineError {
    /// Whether the fault came from a predicate check.
    #[inline]
    pub fn is_predicate_fault(&self) -> bool {
        matches!(self, CoroutineError::Predicate { .. })
    }
}
