//! Deferred manager commands
//!
//! Step bodies run while [`CoroutineManager::update`] holds the manager
//! mutably, so they cannot call it directly. A [`ManagerHandle`] queues
//! commands instead. The manager applies the queue before it visits each
//! coroutine and once more when the pass ends, so a stop issued mid-pass
//! lands before the stopped coroutine is reached.
//!
//! [`CoroutineManager::update`]: super::CoroutineManager::update

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::runtime::coroutine::{Coroutine, CoroutineId, StepProcedure};

/// Command queued through a [`ManagerHandle`].
#[derive(Debug)]
pub(crate) enum Command {
    Spawn(Coroutine),
    Stop(CoroutineId),
}

/// Cloneable handle that lets step bodies start and stop coroutines.
///
/// Obtained from [`CoroutineManager::handle`](super::CoroutineManager::handle).
/// Every clone feeds the same queue. Commands issued after the manager is
/// dropped are discarded with the last handle.
#[derive(Clone, Default)]
pub struct ManagerHandle {
    commands: Rc<RefCell<VecDeque<Command>>>,
}

impl ManagerHandle {
    /// Queue a new coroutine running `procedure`.
    ///
    /// The ID is allocated now. The coroutine is registered when the manager
    /// next applies its queue, and its opening segment runs on the first
    /// update pass that starts after that.
    pub fn start<P>(
        &self,
        procedure: P,
    ) -> CoroutineId
    where
        P: StepProcedure + 'static,
    {
        self.spawn(Coroutine::new(procedure))
    }

    /// Queue an already built coroutine.
    pub fn spawn(
        &self,
        coroutine: Coroutine,
    ) -> CoroutineId {
        let id = coroutine.id();
        self.push(Command::Spawn(coroutine));
        id
    }

    /// Queue a stop for `id`.
    ///
    /// Inside an update pass this takes effect before the manager visits
    /// `id`, even if the pass has not reached it yet. Unknown IDs are ignored.
    pub fn stop(
        &self,
        id: CoroutineId,
    ) {
        self.push(Command::Stop(id));
    }

    /// Number of commands not yet applied.
    #[inline]
    pub fn pending(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Take the oldest queued command.
    pub(crate) fn pop(&self) -> Option<Command> {
        self.commands.borrow_mut().pop_front()
    }

    fn push(
        &self,
        command: Command,
    ) {
        self.commands.borrow_mut().push_back(command);
    }
}

impl fmt::Debug for ManagerHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ManagerHandle")
            .field("pending", &self.pending())
            .finish()
    }
}
