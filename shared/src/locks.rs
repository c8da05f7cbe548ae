use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlayerName, VesselId};

/// The kind of authority a lock grants over a vessel.
///
/// `Control` marks the player actively flying the vessel. The update kinds
/// grant permission to broadcast authoritative state: `UpdateLoaded` for a
/// vessel within physics range, `UpdateUnloaded` for one simulated on rails
/// (debris, abandoned stages, far-away craft).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LockKind {
    Control,
    UpdateLoaded,
    UpdateUnloaded,
}

impl LockKind {
    pub fn is_update(self) -> bool {
        matches!(self, LockKind::UpdateLoaded | LockKind::UpdateUnloaded)
    }
}

/// A (vessel, holder, kind) tuple. At most one holder exists per
/// (vessel, kind) at any instant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockDefinition {
    pub vessel: VesselId,
    pub holder: PlayerName,
    pub kind: LockKind,
}

impl LockDefinition {
    pub fn new(vessel: VesselId, holder: impl Into<PlayerName>, kind: LockKind) -> Self {
        Self {
            vessel,
            holder: holder.into(),
            kind,
        }
    }
}

/// Errors raised by lock registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LockError {
    /// No lock of the requested kind exists for the vessel
    #[error("no {kind:?} lock exists for vessel {vessel}")]
    LockNotFound { vessel: VesselId, kind: LockKind },

    /// A release was attempted by a player that does not hold the lock
    #[error("{kind:?} lock for vessel {vessel} is held by {holder}, not {requester}")]
    NotHolder {
        vessel: VesselId,
        kind: LockKind,
        holder: PlayerName,
        requester: PlayerName,
    },
}
