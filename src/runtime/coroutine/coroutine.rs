//! The coroutine state machine.

use std::fmt;

use tracing::{debug, trace};

use super::error::CoroutineError;
use super::id::CoroutineId;
use super::predicate::SuspensionPredicate;
use super::step::{Step, StepProcedure, Yield};

/// What a started coroutine is blocked on.
enum Pending {
    Tick,
    Wait(SuspensionPredicate),
    Nested(Box<Coroutine>),
}

impl From<Yield> for Pending {
    fn from(value: Yield) -> Self {
        match value {
            Yield::Tick => Pending::Tick,
            Yield::Wait(predicate) => Pending::Wait(predicate),
            Yield::Nested(coroutine) => Pending::Nested(Box::new(coroutine)),
            Yield::Sequence(procedure) => Pending::Nested(Box::new(Coroutine::from_boxed(procedure))),
        }
    }
}

/// A suspendable execution unit driven once per tick.
///
/// The first [`update`](Self::update) always runs the opening segment. Every
/// later call evaluates whatever the procedure last yielded and runs at most
/// one more segment. The same holds for every coroutine in a nested chain:
/// one update of the outermost coroutine resumes each of them at most once.
pub struct Coroutine {
    /// Unique ID.
    id: CoroutineId,
    /// Optional label for log records.
    name: Option<String>,
    /// Dropped on completion or stop.
    procedure: Option<Box<dyn StepProcedure>>,
    /// Only meaningful while started and not finished.
    pending: Option<Pending>,
    started: bool,
    finished: bool,
}

impl Coroutine {
    /// Wrap a procedure in a new, unstarted coroutine.
    pub fn new<P>(procedure: P) -> Self
    where
        P: StepProcedure + 'static,
    {
        Self::from_boxed(Box::new(procedure))
    }

    /// Wrap a procedure and give the coroutine a name.
    pub fn named<P>(
        name: impl Into<String>,
        procedure: P,
    ) -> Self
    where
        P: StepProcedure + 'static,
    {
        let mut coroutine = Self::new(procedure);
        coroutine.name = Some(name.into());
        coroutine
    }

    pub(crate) fn from_boxed(procedure: Box<dyn StepProcedure>) -> Self {
        Self {
            id: CoroutineId::next(),
            name: None,
            procedure: Some(procedure),
            pending: None,
            started: false,
            finished: false,
        }
    }

    /// Get the coroutine ID.
    #[inline]
    pub fn id(&self) -> CoroutineId {
        self.id
    }

    /// Get the coroutine name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the opening segment has run.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the coroutine finished or was stopped.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Whether the coroutine is currently blocked on a nested coroutine.
    #[inline]
    pub fn is_waiting_on_nested(&self) -> bool {
        matches!(self.pending, Some(Pending::Nested(_)))
    }

    /// Length of the chain of nested coroutines this one is waiting on.
    pub fn depth(&self) -> usize {
        match &self.pending {
            Some(Pending::Nested(inner)) => 1 + inner.depth(),
            _ => 0,
        }
    }

    /// The predicate currently blocking this coroutine, if any.
    pub fn pending_predicate(&self) -> Option<&SuspensionPredicate> {
        match &self.pending {
            Some(Pending::Wait(predicate)) => Some(predicate),
            _ => None,
        }
    }

    /// Advance by one tick of length `dt` seconds.
    ///
    /// Returns whether the coroutine is still running afterwards. A fault from
    /// the procedure, a predicate, or any nested coroutine leaves this
    /// coroutine stopped before the error is returned.
    pub fn update(
        &mut self,
        dt: f64,
    ) -> Result<bool, CoroutineError> {
        if self.finished {
            return Ok(false);
        }
        let result = self.advance(dt);
        if result.is_err() {
            self.stop();
        }
        result
    }

    fn advance(
        &mut self,
        dt: f64,
    ) -> Result<bool, CoroutineError> {
        if !self.started {
            self.started = true;
            return self.resume_step(dt);
        }

        let satisfied = match self.pending.as_mut() {
            None | Some(Pending::Tick) => true,
            Some(Pending::Wait(predicate)) => predicate.is_satisfied(dt)?,
            Some(Pending::Nested(inner)) => !inner.update(dt)?,
        };

        if !satisfied {
            return Ok(true);
        }
        self.resume_step(dt)
    }

    /// Run one segment and capture what it yielded.
    ///
    /// A freshly yielded nested coroutine gets its own update for this tick
    /// right away, so its opening segment runs alongside the parent's.
    fn resume_step(
        &mut self,
        dt: f64,
    ) -> Result<bool, CoroutineError> {
        let Some(procedure) = self.procedure.as_mut() else {
            self.finish();
            return Ok(false);
        };

        trace!(id = %self.id, name = ?self.name, "resume step");
        let step = procedure
            .resume()
            .map_err(|source| CoroutineError::Procedure { source })?;

        match step {
            Step::Finished => {
                self.finish();
                debug!(id = %self.id, name = ?self.name, "coroutine finished");
                Ok(false)
            }
            Step::Yielded(value) => {
                let pending = self.pending.insert(Pending::from(value));
                if let Pending::Nested(inner) = pending {
                    inner.update(dt)?;
                }
                Ok(true)
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending = None;
        self.procedure = None;
    }

    /// Terminate immediately without resuming the procedure again.
    ///
    /// Nested coroutines are stopped first, to any depth. Calling this on a
    /// finished coroutine does nothing.
    pub fn stop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(Pending::Nested(inner)) = self.pending.as_mut() {
            inner.stop();
        }
        self.finish();
        debug!(id = %self.id, name = ?self.name, "coroutine stopped");
    }
}

impl fmt::Debug for Coroutine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let pending = match &self.pending {
            None => "none",
            Some(Pending::Tick) => "tick",
            Some(Pending::Wait(_)) => "predicate",
            Some(Pending::Nested(_)) => "nested",
        };
        f.debug_struct("Coroutine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("started", &self.started)
            .field("finished", &self.finished)
            .field("pending", &pending)
            .finish()
    }
}
