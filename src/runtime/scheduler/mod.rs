//! Coroutine manager
//!
//! This module provides the [`CoroutineManager`], which owns a set of
//! independently running coroutines and drives each of them once per host
//! tick. Coroutines that finish during a tick are dropped in that same tick.
//! Step bodies reach the manager through a [`ManagerHandle`].

mod handle;

pub use handle::ManagerHandle;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::runtime::coroutine::{Coroutine, CoroutineError, CoroutineId, StepProcedure};
use crate::util::config::SchedulerConfig;
use handle::Command;

/// Fault escaping [`CoroutineManager::update`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A registered coroutine faulted and was removed.
    #[error("{id} faulted: {source}")]
    Faulted {
        id: CoroutineId,
        #[source]
        source: CoroutineError,
    },
}

impl SchedulerError {
    /// ID of the coroutine that faulted.
    #[inline]
    pub fn id(&self) -> CoroutineId {
        match self {
            SchedulerError::Faulted { id, .. } => *id,
        }
    }
}

/// Scheduler statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SchedulerStats {
    /// Total ticks processed.
    pub ticks: u64,
    /// Total coroutines registered.
    pub started: u64,
    /// Coroutines that ran to completion.
    pub completed: u64,
    /// Coroutines stopped through the manager.
    pub stopped: u64,
    /// Coroutines removed because of a fault.
    pub faulted: u64,
    /// Peak number of registered coroutines.
    pub peak_active: usize,
    /// Sum of the effective `dt` of every tick.
    pub total_time: f64,
}

/// Owns independently running coroutines and ticks them together.
///
/// Iteration follows registration order, though no coroutine may rely on the
/// order in which it runs relative to its siblings.
#[derive(Debug)]
pub struct CoroutineManager {
    /// Configuration.
    config: SchedulerConfig,
    /// Active coroutines in registration order.
    coroutines: IndexMap<CoroutineId, Coroutine>,
    /// Statistics.
    stats: SchedulerStats,
    /// Commands queued by step bodies.
    commands: ManagerHandle,
}

impl CoroutineManager {
    /// Create a manager with default config.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create a manager with custom configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            coroutines: IndexMap::with_capacity(config.initial_capacity),
            config,
            stats: SchedulerStats::default(),
            commands: ManagerHandle::default(),
        }
    }

    /// Handle for starting and stopping coroutines from inside step bodies.
    #[inline]
    pub fn handle(&self) -> ManagerHandle {
        self.commands.clone()
    }

    /// Wrap `procedure` in a new coroutine and register it.
    ///
    /// Nothing runs yet: the opening segment executes on the next
    /// [`update`](Self::update).
    pub fn start<P>(
        &mut self,
        procedure: P,
    ) -> CoroutineId
    where
        P: StepProcedure + 'static,
    {
        self.spawn(Coroutine::new(procedure))
    }

    /// Register an already built coroutine.
    ///
    /// A coroutine that is already complete is not registered; its ID is
    /// still returned and reports inactive.
    pub fn spawn(
        &mut self,
        coroutine: Coroutine,
    ) -> CoroutineId {
        let id = coroutine.id();
        if coroutine.is_complete() {
            return id;
        }
        debug!(manager = %self.config.name, %id, name = ?coroutine.name(), "coroutine started");
        self.coroutines.insert(id, coroutine);
        self.stats.started += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.coroutines.len());
        id
    }

    /// Tick every registered coroutine once with `dt` seconds.
    ///
    /// `dt` goes through [`SchedulerConfig::effective_dt`] first. Queued
    /// handle commands are applied before each coroutine is visited, so a
    /// coroutine stopped mid-pass is skipped and one started mid-pass first
    /// runs next tick. Coroutines that finish are removed as soon as they
    /// return. If one faults, it is removed, the rest of the pass is skipped
    /// and the fault is returned.
    pub fn update(
        &mut self,
        dt: f64,
    ) -> Result<(), SchedulerError> {
        let dt = self.config.effective_dt(dt);
        self.stats.ticks += 1;
        self.stats.total_time += dt;

        let snapshot: Vec<CoroutineId> = self.coroutines.keys().copied().collect();
        let mut fault = None;

        for id in snapshot {
            self.apply_commands();
            let Some(coroutine) = self.coroutines.get_mut(&id) else {
                continue;
            };
            match coroutine.update(dt) {
                Ok(true) => {}
                Ok(false) => {
                    self.coroutines.shift_remove(&id);
                    self.stats.completed += 1;
                    trace!(manager = %self.config.name, %id, "coroutine reclaimed");
                }
                Err(source) => {
                    self.coroutines.shift_remove(&id);
                    self.stats.faulted += 1;
                    fault = Some(SchedulerError::Faulted { id, source });
                    break;
                }
            }
        }
        self.apply_commands();

        match fault {
            Some(err) => {
                warn!(manager = %self.config.name, id = %err.id(), error = %err, "coroutine faulted");
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Apply every command queued through a [`ManagerHandle`], oldest first.
    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.pop() {
            match command {
                Command::Spawn(coroutine) => {
                    self.spawn(coroutine);
                }
                Command::Stop(id) => {
                    if self.stop(id) {
                        trace!(manager = %self.config.name, %id, "deferred stop applied");
                    }
                }
            }
        }
    }

    /// Stop and remove a registered coroutine.
    ///
    /// Returns `false` without side effects if `id` is not registered.
    pub fn stop(
        &mut self,
        id: CoroutineId,
    ) -> bool {
        match self.coroutines.shift_remove(&id) {
            Some(mut coroutine) => {
                coroutine.stop();
                self.stats.stopped += 1;
                true
            }
            None => false,
        }
    }

    /// Stop every registered coroutine and clear the registry.
    ///
    /// Queued handle commands are applied first, so pending starts are
    /// stopped too.
    pub fn stop_all(&mut self) {
        self.apply_commands();
        let count = self.coroutines.len();
        for (_, mut coroutine) in self.coroutines.drain(..) {
            coroutine.stop();
        }
        self.stats.stopped += count as u64;
        if count > 0 {
            debug!(manager = %self.config.name, count, "stopped all coroutines");
        }
    }

    /// Number of registered coroutines.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.coroutines.len()
    }

    /// Snapshot of the registered IDs, in registration order.
    pub fn active_coroutines(&self) -> Vec<CoroutineId> {
        self.coroutines.keys().copied().collect()
    }

    /// Whether `id` is still registered.
    #[inline]
    pub fn is_active(
        &self,
        id: CoroutineId,
    ) -> bool {
        self.coroutines.contains_key(&id)
    }

    /// Look up a registered coroutine.
    #[inline]
    pub fn get(
        &self,
        id: CoroutineId,
    ) -> Option<&Coroutine> {
        self.coroutines.get(&id)
    }

    /// Get statistics.
    #[inline]
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl Default for CoroutineManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CoroutineManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}
