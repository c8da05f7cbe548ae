//! # `SyncConfig` – timing knobs of the sync layer
//!
//! Every suspension point in the protocol (dock grace, catch-up poll,
//! debounce window) reads its duration from this struct. The values are set
//! once when the layer is constructed; handlers never mutate them.

use std::time::Duration;

pub struct SyncConfig {
    /// Wait before the non-dominant side broadcasts dock information. The
    /// dominant-vessel owner must detect and process the merge first; a
    /// premature broadcast from the weak side makes the dominant owner
    /// misclassify itself as the weak party, corrupting a later undock.
    pub weak_side_dock_grace: Duration,
    /// Interval between checks of "has the active vessel become the dominant
    /// one" after a dock on the non-dominant side.
    pub catch_up_poll_interval: Duration,
    /// Give up polling after this long. Degraded delivery, not an error: the
    /// dominant owner re-announces the vessel through its own part-count
    /// path.
    pub catch_up_timeout: Duration,
    /// Extra wait after the switch to the dominant vessel is observed, so the
    /// dominant owner's client detects the dock before our full snapshot
    /// arrives.
    pub post_catch_up_grace: Duration,
    /// Window used to coalesce a burst of part-count-change notifications
    /// into one trailing snapshot.
    pub part_change_debounce: Duration,
    /// Wait before announcing a freshly created vessel, so it has been named
    /// and finalized by the game.
    pub new_vessel_announce_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            weak_side_dock_grace: Duration::from_secs(3),
            catch_up_poll_interval: Duration::from_millis(500),
            catch_up_timeout: Duration::from_secs(30),
            post_catch_up_grace: Duration::from_secs(5),
            part_change_debounce: Duration::from_millis(500),
            new_vessel_announce_delay: Duration::from_millis(500),
        }
    }
}
