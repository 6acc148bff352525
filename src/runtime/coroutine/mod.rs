//! Cooperative coroutines
//!
//! This module provides the building blocks of the tick-driven scheduler:
//!
//! - [`SuspensionPredicate`](predicate::SuspensionPredicate) - Timed/Until/While resume conditions
//! - [`StepProcedure`](step::StepProcedure) - The resumable body a coroutine drives
//! - [`Yield`](step::Yield) - What a procedure waits on between segments
//! - [`Coroutine`](coroutine::Coroutine) - The per-coroutine state machine
//! - [`CoroutineError`](error::CoroutineError) - Faults raised by application code

#[allow(clippy::module_inception)]
pub mod coroutine;
pub mod error;
pub mod id;
pub mod predicate;
pub mod step;

pub use coroutine::Coroutine;
pub use error::{CoroutineError, Fault};
pub use id::CoroutineId;
pub use predicate::{Check, SuspensionPredicate};
pub use step::{from_fn, FromFn, Sequence, Step, StepProcedure, Yield};

#[cfg(test)]
mod tests;
