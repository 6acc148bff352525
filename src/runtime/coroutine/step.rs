//! Step procedures
//!
//! A step procedure is the resumable body a [`Coroutine`] drives. Each call to
//! [`StepProcedure::resume`] runs exactly one segment: from the previous
//! suspension point to the next one, or to the end.
//!
//! Two ready-made shapes are provided:
//!
//! - [`from_fn`] wraps a closure holding its own state machine.
//! - [`Sequence`] chains one-shot segments for linear scripts.
//!
//! # Example
//!
//! ```
//! use tickflow::runtime::coroutine::{Sequence, SuspensionPredicate, Yield};
//!
//! let script = Sequence::new()
//!     .yielding(|| {
//!         println!("fade out");
//!         SuspensionPredicate::seconds(0.5).into()
//!     })
//!     .yielding(|| {
//!         println!("swap scene");
//!         Yield::Tick
//!     })
//!     .finish(|| println!("fade in"));
//! assert_eq!(script.len(), 3);
//! ```

use std::collections::VecDeque;
use std::fmt;

use super::coroutine::Coroutine;
use super::error::Fault;
use super::predicate::SuspensionPredicate;

/// What a step procedure is waiting on after a segment.
pub enum Yield {
    /// Resume after exactly one more tick.
    Tick,
    /// Resume once the predicate is satisfied.
    Wait(SuspensionPredicate),
    /// Resume once the nested coroutine finishes.
    Nested(Coroutine),
    /// Raw procedure, promoted to a fresh nested coroutine when captured.
    Sequence(Box<dyn StepProcedure>),
}

impl Yield {
    /// Yield a raw procedure to be run as a nested coroutine.
    #[inline]
    pub fn sequence<P>(procedure: P) -> Self
    where
        P: StepProcedure + 'static,
    {
        Yield::Sequence(Box::new(procedure))
    }
}

impl From<SuspensionPredicate> for Yield {
    fn from(predicate: SuspensionPredicate) -> Self {
        Yield::Wait(predicate)
    }
}

impl From<Coroutine> for Yield {
    fn from(coroutine: Coroutine) -> Self {
        Yield::Nested(coroutine)
    }
}

impl From<Sequence> for Yield {
    fn from(sequence: Sequence) -> Self {
        Yield::Sequence(Box::new(sequence))
    }
}

impl fmt::Debug for Yield {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Yield::Tick => f.write_str("Tick"),
            Yield::Wait(predicate) => f.debug_tuple("Wait").field(predicate).finish(),
            Yield::Nested(coroutine) => f.debug_tuple("Nested").field(coroutine).finish(),
            Yield::Sequence(_) => f.write_str("Sequence(..)"),
        }
    }
}

/// Outcome of one resume.
#[derive(Debug)]
pub enum Step {
    /// The procedure suspended on the given value.
    Yielded(Yield),
    /// The procedure ran to completion.
    Finished,
}

impl Step {
    /// Suspend on anything convertible into a [`Yield`].
    #[inline]
    pub fn yielded(value: impl Into<Yield>) -> Self {
        Step::Yielded(value.into())
    }

    /// Suspend for exactly one tick.
    #[inline]
    pub fn tick() -> Self {
        Step::Yielded(Yield::Tick)
    }
}

/// A resumable unit of work.
///
/// Implementations must run strictly one segment per call and are never
/// re-entered while a call is in progress.
pub trait StepProcedure {
    /// Run the next segment.
    fn resume(&mut self) -> Result<Step, Fault>;
}

impl<P: StepProcedure + ?Sized> StepProcedure for Box<P> {
    fn resume(&mut self) -> Result<Step, Fault> {
        (**self).resume()
    }
}

/// Procedure backed by a closure. See [`from_fn`].
pub struct FromFn<F>(F);

/// Build a step procedure from a closure.
///
/// The closure is called once per resume and keeps whatever state it needs to
/// know which segment comes next.
///
/// ```
/// use tickflow::runtime::coroutine::{from_fn, Step};
///
/// let mut stage = 0;
/// let _blink = from_fn(move || {
///     stage += 1;
///     Ok(if stage < 3 { Step::tick() } else { Step::Finished })
/// });
/// ```
#[inline]
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<Step, Fault>,
{
    FromFn(f)
}

impl<F> StepProcedure for FromFn<F>
where
    F: FnMut() -> Result<Step, Fault>,
{
    #[inline]
    fn resume(&mut self) -> Result<Step, Fault> {
        (self.0)()
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}

type Segment = Box<dyn FnOnce() -> Result<Option<Yield>, Fault>>;

/// Linear script of one-shot segments.
///
/// Each resume runs the next segment. A segment that returns `Some` suspends
/// on that value; one that returns `None` ends the procedure immediately.
/// Once every segment has run, the next resume reports [`Step::Finished`].
#[derive(Default)]
pub struct Sequence {
    segments: VecDeque<Segment>,
    done: bool,
}

impl Sequence {
    /// Create an empty sequence.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a general segment.
    pub fn segment<F>(
        mut self,
        segment: F,
    ) -> Self
    where
        F: FnOnce() -> Result<Option<Yield>, Fault> + 'static,
    {
        self.segments.push_back(Box::new(segment));
        self
    }

    /// Append a segment that always suspends.
    pub fn yielding<F>(
        self,
        segment: F,
    ) -> Self
    where
        F: FnOnce() -> Yield + 'static,
    {
        self.segment(move || Ok(Some(segment())))
    }

    /// Append a segment that ends the procedure once it has run.
    pub fn finish<F>(
        self,
        segment: F,
    ) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.segment(move || {
            segment();
            Ok(None)
        })
    }

    /// Number of segments not yet run.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segments remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn close(&mut self) {
        self.done = true;
        self.segments.clear();
    }
}

impl StepProcedure for Sequence {
    fn resume(&mut self) -> Result<Step, Fault> {
        if self.done {
            return Ok(Step::Finished);
        }
        let Some(segment) = self.segments.pop_front() else {
            self.close();
            return Ok(Step::Finished);
        };
        match segment() {
            Ok(Some(value)) => Ok(Step::Yielded(value)),
            Ok(None) => {
                self.close();
                Ok(Step::Finished)
            }
            Err(fault) => {
                self.close();
                Err(fault)
            }
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("remaining", &self.segments.len())
            .field("done", &self.done)
            .finish()
    }
}
