use std::collections::HashMap;

use log::info;

use stellarlink_shared::{LockError, LockKind, PlayerName, VesselId};

/// The single source of truth for "who may mutate vessel X".
///
/// Maps each vessel to its per-kind lock holder. The exclusivity invariant —
/// at most one holder per (vessel, kind) at any instant — is structural:
/// acquisition overwrites the conflicting holder in the same registry write,
/// so two holders can never be observed, not even transiently.
pub struct LockRegistry {
    locks: HashMap<VesselId, HashMap<LockKind, PlayerName>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: HashMap::new(),
        }
    }

    pub fn holder(&self, vessel: VesselId, kind: LockKind) -> Option<&PlayerName> {
        self.locks.get(&vessel).and_then(|kinds| kinds.get(&kind))
    }

    pub fn control_lock_owner(&self, vessel: VesselId) -> Option<&PlayerName> {
        self.holder(vessel, LockKind::Control)
    }

    /// Whether an update lock of either kind exists for the vessel.
    pub fn update_lock_exists(&self, vessel: VesselId) -> bool {
        self.holder(vessel, LockKind::UpdateLoaded).is_some()
            || self.holder(vessel, LockKind::UpdateUnloaded).is_some()
    }

    pub fn unloaded_update_lock_exists(&self, vessel: VesselId) -> bool {
        self.holder(vessel, LockKind::UpdateUnloaded).is_some()
    }

    /// Whether `player` holds an update lock (of either kind) for the vessel.
    pub fn update_lock_belongs_to(&self, vessel: VesselId, player: &str) -> bool {
        [LockKind::UpdateLoaded, LockKind::UpdateUnloaded]
            .iter()
            .any(|kind| self.holder(vessel, *kind).map(String::as_str) == Some(player))
    }

    /// Acquire an update lock for `player`, releasing any conflicting holder
    /// of the same kind first.
    pub fn acquire_update_lock(&mut self, vessel: VesselId, loaded: bool, player: &str) {
        let kind = if loaded {
            LockKind::UpdateLoaded
        } else {
            LockKind::UpdateUnloaded
        };
        self.acquire(vessel, kind, player);
    }

    pub fn acquire_control_lock(&mut self, vessel: VesselId, player: &str) {
        self.acquire(vessel, LockKind::Control, player);
    }

    fn acquire(&mut self, vessel: VesselId, kind: LockKind, player: &str) {
        let kinds = self.locks.entry(vessel).or_default();
        if let Some(previous) = kinds.insert(kind, player.to_owned()) {
            if previous != player {
                info!(
                    "{:?} lock for vessel {} migrated from {} to {}",
                    kind, vessel, previous, player
                );
            }
        } else {
            info!("{:?} lock for vessel {} acquired by {}", kind, vessel, player);
        }
    }

    /// Release one lock, verifying the requester actually holds it.
    pub fn release_lock(
        &mut self,
        vessel: VesselId,
        kind: LockKind,
        requester: &str,
    ) -> Result<(), LockError> {
        let kinds = self
            .locks
            .get_mut(&vessel)
            .ok_or(LockError::LockNotFound { vessel, kind })?;
        let holder = kinds
            .get(&kind)
            .ok_or(LockError::LockNotFound { vessel, kind })?;

        if holder != requester {
            return Err(LockError::NotHolder {
                vessel,
                kind,
                holder: holder.clone(),
                requester: requester.to_owned(),
            });
        }

        kinds.remove(&kind);
        if kinds.is_empty() {
            self.locks.remove(&vessel);
        }
        Ok(())
    }

    /// Release every lock any of the named players holds against the vessel.
    /// Used after an undock so the rightful owner can re-acquire. Players
    /// holding nothing are skipped silently.
    pub fn release_all_locks<'a>(
        &mut self,
        players: impl IntoIterator<Item = &'a PlayerName>,
        vessel: VesselId,
    ) {
        let Some(kinds) = self.locks.get_mut(&vessel) else {
            return;
        };
        for player in players {
            let released: Vec<LockKind> = kinds
                .iter()
                .filter(|(_, holder)| *holder == player)
                .map(|(kind, _)| *kind)
                .collect();
            for kind in released {
                kinds.remove(&kind);
                info!("{:?} lock for vessel {} released from {}", kind, vessel, player);
            }
        }
        if kinds.is_empty() {
            self.locks.remove(&vessel);
        }
    }

    pub fn locked_vessel_count(&self) -> usize {
        self.locks.len()
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
