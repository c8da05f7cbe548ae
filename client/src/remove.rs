use std::collections::HashSet;

use log::info;

use stellarlink_shared::{OutboundMessage, VesselId};

use crate::sender::MessageSender;

/// Tracks vessels scheduled for removal and emits the removal broadcasts.
///
/// Removal is a set-delete, not a counter: flagging the same vessel twice is
/// equivalent to flagging it once, and only the first flag broadcasts.
pub struct RemovalTracker {
    pending: HashSet<VesselId>,
}

impl RemovalTracker {
    pub fn new() -> Self {
        Self {
            pending: HashSet::new(),
        }
    }

    /// Whether the vessel is already scheduled for removal. Change signals
    /// from such a vessel are transient and must be ignored.
    pub fn will_be_killed(&self, vessel: VesselId) -> bool {
        self.pending.contains(&vessel)
    }

    /// Destructively kill a vessel that should never have existed on this
    /// client (e.g. one created while spectating).
    pub fn flag_for_kill(&mut self, vessel: VesselId, reason: &str, sender: &mut dyn MessageSender) {
        if !self.pending.insert(vessel) {
            return;
        }
        info!("killing vessel {}: {}", vessel, reason);
        sender.send(OutboundMessage::VesselRemove {
            vessel_id: vessel,
            destructive: true,
        });
    }

    /// Soft-remove a vessel whose identity was absorbed in a dock merge.
    /// Crew and science already transferred stay intact on all clients.
    pub fn soft_remove(&mut self, vessel: VesselId, sender: &mut dyn MessageSender) {
        if !self.pending.insert(vessel) {
            return;
        }
        sender.send(OutboundMessage::VesselRemove {
            vessel_id: vessel,
            destructive: false,
        });
    }

    /// Drop markers for vessels the game no longer knows. The marker exists
    /// to swallow a dying vessel's transient signals; once the deletion is
    /// confirmed it has no further use.
    pub fn prune_confirmed(&mut self, still_exists: impl Fn(VesselId) -> bool) {
        self.pending.retain(|vessel| still_exists(*vessel));
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for RemovalTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fakes::RecordingSender;

    #[test]
    fn soft_remove_is_idempotent() {
        let mut tracker = RemovalTracker::new();
        let mut sender = RecordingSender::new();
        let vessel = VesselId::random();

        tracker.soft_remove(vessel, &mut sender);
        tracker.soft_remove(vessel, &mut sender);

        assert_eq!(sender.sent.len(), 1);
        assert_eq!(tracker.pending_count(), 1);
        assert!(tracker.will_be_killed(vessel));
    }

    #[test]
    fn pruning_drops_markers_once_the_deletion_is_confirmed() {
        let mut tracker = RemovalTracker::new();
        let mut sender = RecordingSender::new();
        let kept = VesselId::random();
        let gone = VesselId::random();

        tracker.soft_remove(kept, &mut sender);
        tracker.soft_remove(gone, &mut sender);

        tracker.prune_confirmed(|vessel| vessel == kept);

        assert!(tracker.will_be_killed(kept));
        assert!(!tracker.will_be_killed(gone));
        assert_eq!(tracker.pending_count(), 1);
    }

    #[test]
    fn kill_broadcasts_destructively() {
        let mut tracker = RemovalTracker::new();
        let mut sender = RecordingSender::new();
        let vessel = VesselId::random();

        tracker.flag_for_kill(vessel, "created while spectating", &mut sender);

        assert_eq!(
            sender.sent,
            vec![OutboundMessage::VesselRemove {
                vessel_id: vessel,
                destructive: true,
            }]
        );
    }
}
