//! Cancellable-task registry.
//!
//! All waiting in the sync layer is cooperative: a handler that needs a grace
//! period or a debounce window schedules a continuation here and returns.
//! [`TaskScheduler::take_due`] is pumped from the simulation thread's tick
//! and hands back due tasks as data for the owning engine to interpret —
//! relevance is re-checked at fire time, never assumed from schedule time.
//!
//! Tasks are keyed by `(kind, vessel)`. Scheduling is idempotent per key, so
//! only one continuation of a given kind can be outstanding for a vessel; a
//! newer event supersedes an in-flight one explicitly.

use std::collections::HashMap;

use stellarlink_shared::{SubspaceId, UtcInstant, VesselId};

/// Discriminates the scheduled continuations of the protocol.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TaskKind {
    /// Weak-side dock broadcast after the grace period.
    DockInfoGrace,
    /// Poll for the switch to the dominant vessel after a dock.
    CatchUpPoll,
    /// Post-switch grace before the full-proto dock broadcast.
    CatchUpGrace,
    /// Trailing coalesced snapshot of a part-count-change burst.
    PartChangeFlush,
    /// Delayed announce of a freshly created vessel.
    NewVesselAnnounce,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey {
    pub kind: TaskKind,
    pub vessel: VesselId,
}

/// Payload handed back to the engine when a task fires.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduledAction {
    SendWeakSideDockInfo {
        weak: VesselId,
        subspace: SubspaceId,
    },
    PollForDominantSwitch {
        weak: VesselId,
        subspace: SubspaceId,
        deadline: UtcInstant,
    },
    SendCaughtUpDockInfo {
        weak: VesselId,
        subspace: SubspaceId,
    },
    FlushPartChange {
        vessel: VesselId,
    },
    AnnounceNewVessel {
        vessel: VesselId,
    },
}

impl ScheduledAction {
    pub fn kind(&self) -> TaskKind {
        match self {
            ScheduledAction::SendWeakSideDockInfo { .. } => TaskKind::DockInfoGrace,
            ScheduledAction::PollForDominantSwitch { .. } => TaskKind::CatchUpPoll,
            ScheduledAction::SendCaughtUpDockInfo { .. } => TaskKind::CatchUpGrace,
            ScheduledAction::FlushPartChange { .. } => TaskKind::PartChangeFlush,
            ScheduledAction::AnnounceNewVessel { .. } => TaskKind::NewVesselAnnounce,
        }
    }

    /// The vessel that keys this task.
    pub fn vessel(&self) -> VesselId {
        match self {
            ScheduledAction::SendWeakSideDockInfo { weak, .. } => *weak,
            ScheduledAction::PollForDominantSwitch { weak, .. } => *weak,
            ScheduledAction::SendCaughtUpDockInfo { weak, .. } => *weak,
            ScheduledAction::FlushPartChange { vessel } => *vessel,
            ScheduledAction::AnnounceNewVessel { vessel } => *vessel,
        }
    }

    pub fn key(&self) -> TaskKey {
        TaskKey {
            kind: self.kind(),
            vessel: self.vessel(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    pub fire_at: UtcInstant,
    pub action: ScheduledAction,
}

pub struct TaskScheduler {
    tasks: HashMap<TaskKey, ScheduledTask>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Schedule `action` to fire at `fire_at`. Idempotent per key: returns
    /// `false` and leaves the existing task untouched when one of the same
    /// kind is already pending for the vessel.
    pub fn schedule(&mut self, fire_at: UtcInstant, action: ScheduledAction) -> bool {
        let key = action.key();
        if self.tasks.contains_key(&key) {
            return false;
        }
        self.tasks.insert(key, ScheduledTask { fire_at, action });
        true
    }

    /// Schedule `action`, replacing any pending task of the same key.
    pub fn supersede(&mut self, fire_at: UtcInstant, action: ScheduledAction) {
        let key = action.key();
        self.tasks.insert(key, ScheduledTask { fire_at, action });
    }

    /// Drop the pending task for `key`, if any.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.tasks.remove(&key).is_some()
    }

    /// Drop every pending task of the given kind, regardless of vessel.
    pub fn cancel_kind(&mut self, kind: TaskKind) {
        self.tasks.retain(|key, _| key.kind != kind);
    }

    /// Drop every pending task keyed by `vessel`, regardless of kind.
    pub fn cancel_vessel(&mut self, vessel: VesselId) {
        self.tasks.retain(|key, _| key.vessel != vessel);
    }

    pub fn is_scheduled(&self, key: TaskKey) -> bool {
        self.tasks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remove and return every task due at `now`, ordered by fire time.
    pub fn take_due(&mut self, now: UtcInstant) -> Vec<ScheduledTask> {
        let due_keys: Vec<TaskKey> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.fire_at <= now)
            .map(|(key, _)| *key)
            .collect();

        let mut due: Vec<ScheduledTask> = due_keys
            .into_iter()
            .filter_map(|key| self.tasks.remove(&key))
            .collect();
        due.sort_by_key(|task| task.fire_at);
        due
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}
