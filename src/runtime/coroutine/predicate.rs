//! Suspension predicates
//!
//! A blocked coroutine asks its predicate once per tick whether it may resume.

use std::fmt;
use std::time::Duration;

use super::error::{CoroutineError, Fault};

/// Zero-argument condition polled by `Until`/`While`.
pub type Check = Box<dyn FnMut() -> Result<bool, Fault>>;

/// Condition that decides when a suspended coroutine may resume.
pub enum SuspensionPredicate {
    /// Satisfied once the accumulated tick time reaches `duration` seconds.
    Timed {
        /// Target duration in seconds.
        duration: f64,
        /// Accumulated elapsed time in seconds.
        elapsed: f64,
    },
    /// Satisfied when the check returns `true`.
    Until(Check),
    /// Satisfied when the check returns `false`.
    While(Check),
}

impl SuspensionPredicate {
    /// Wait for `duration` seconds of accumulated tick time.
    ///
    /// Negative and NaN durations are treated as zero.
    pub fn seconds(duration: f64) -> Self {
        let duration = if duration.is_nan() { 0.0 } else { duration.max(0.0) };
        SuspensionPredicate::Timed {
            duration,
            elapsed: 0.0,
        }
    }

    /// Wait for a [`Duration`] of accumulated tick time.
    #[inline]
    pub fn from_duration(duration: Duration) -> Self {
        Self::seconds(duration.as_secs_f64())
    }

    /// Resume once `check` returns `true`.
    pub fn until<F>(mut check: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        SuspensionPredicate::Until(Box::new(move || Ok(check())))
    }

    /// Resume once `check` returns `false`.
    pub fn while_<F>(mut check: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        SuspensionPredicate::While(Box::new(move || Ok(check())))
    }

    /// Like [`until`](Self::until), for checks that can fail.
    pub fn try_until<F>(check: F) -> Self
    where
        F: FnMut() -> Result<bool, Fault> + 'static,
    {
        SuspensionPredicate::Until(Box::new(check))
    }

    /// Like [`while_`](Self::while_), for checks that can fail.
    pub fn try_while<F>(check: F) -> Self
    where
        F: FnMut() -> Result<bool, Fault> + 'static,
    {
        SuspensionPredicate::While(Box::new(check))
    }

    /// Evaluate the predicate for a tick of length `dt`.
    ///
    /// `Timed` accumulates `dt` first and never fails. `Until`/`While` ignore
    /// `dt` and run their check afresh on every call.
    pub fn is_satisfied(
        &mut self,
        dt: f64,
    ) -> Result<bool, CoroutineError> {
        match self {
            SuspensionPredicate::Timed { duration, elapsed } => {
                *elapsed += dt;
                Ok(*elapsed >= *duration)
            }
            SuspensionPredicate::Until(check) => {
                check().map_err(|source| CoroutineError::Predicate { source })
            }
            SuspensionPredicate::While(check) => check()
                .map(|held| !held)
                .map_err(|source| CoroutineError::Predicate { source }),
        }
    }

    /// Whether this is a `Timed` predicate.
    #[inline]
    pub fn is_timed(&self) -> bool {
        matches!(self, SuspensionPredicate::Timed { .. })
    }

    /// Accumulated time of a `Timed` predicate.
    pub fn elapsed(&self) -> Option<f64> {
        match self {
            SuspensionPredicate::Timed { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    /// Time left before a `Timed` predicate is satisfied, never negative.
    pub fn remaining(&self) -> Option<f64> {
        match self {
            SuspensionPredicate::Timed { duration, elapsed } => Some((duration - elapsed).max(0.0)),
            _ => None,
        }
    }

    /// Fraction of a `Timed` wait already spent, in `0.0..=1.0`.
    ///
    /// A zero-length wait reports `1.0`.
    pub fn progress(&self) -> Option<f64> {
        match self {
            SuspensionPredicate::Timed { duration, elapsed } => {
                if *duration <= 0.0 {
                    Some(1.0)
                } else {
                    Some((elapsed / duration).clamp(0.0, 1.0))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Debug for SuspensionPredicate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SuspensionPredicate::Timed { duration, elapsed } => f
                .debug_struct("Timed")
                .field("duration", duration)
                .field("elapsed", elapsed)
                .finish(),
            SuspensionPredicate::Until(_) => f.write_str("Until(..)"),
            SuspensionPredicate::While(_) => f.write_str("While(..)"),
        }
    }
}
