//! Subspace/warp coordination.
//!
//! Time-warping forks a client into its own simulated-time stream (a
//! subspace). This module tracks which subspace every connected player is in
//! and how far each subspace's simulated time has advanced, and offers the
//! one mutation the docking protocol needs: jump the local client into a
//! target subspace iff that subspace is further along in time.

use std::collections::HashMap;

use log::info;

use stellarlink_shared::{PlayerName, SubspaceId, UtcInstant};

pub struct SubspaceCoordinator {
    /// Simulated-time offset of each known subspace, in milliseconds relative
    /// to network time. Comparing offsets compares "current time" because all
    /// subspaces share the network-time base.
    subspaces: HashMap<SubspaceId, i64>,
    players: HashMap<PlayerName, SubspaceId>,
    current: SubspaceId,
}

impl SubspaceCoordinator {
    /// Starts in `initial` with a zero time offset.
    pub fn new(initial: SubspaceId) -> Self {
        let mut subspaces = HashMap::new();
        subspaces.insert(initial, 0);
        Self {
            subspaces,
            players: HashMap::new(),
            current: initial,
        }
    }

    pub fn current_subspace(&self) -> SubspaceId {
        self.current
    }

    pub fn register_subspace(&mut self, subspace: SubspaceId, offset_millis: i64) {
        self.subspaces.insert(subspace, offset_millis);
    }

    pub fn set_player_subspace(&mut self, player: impl Into<PlayerName>, subspace: SubspaceId) {
        self.players.insert(player.into(), subspace);
    }

    pub fn remove_player(&mut self, player: &str) {
        self.players.remove(player);
    }

    pub fn player_subspace(&self, player: &str) -> Option<SubspaceId> {
        self.players.get(player).copied()
    }

    /// Simulated "current time" of a subspace, given the network time `now`.
    pub fn subspace_time(&self, subspace: SubspaceId, now: UtcInstant) -> Option<UtcInstant> {
        self.subspaces
            .get(&subspace)
            .map(|offset| now.offset_by(*offset))
    }

    pub fn current_subspace_time(&self, now: UtcInstant) -> UtcInstant {
        self.subspace_time(self.current, now).unwrap_or(now)
    }

    /// Millisecond lead of `a` over `b`; zero when either is unknown.
    pub fn advancement_millis(&self, a: SubspaceId, b: SubspaceId) -> i64 {
        match (self.subspaces.get(&a), self.subspaces.get(&b)) {
            (Some(offset_a), Some(offset_b)) => offset_a - offset_b,
            _ => 0,
        }
    }

    /// Whether subspace `a`'s current time is strictly ahead of `b`'s.
    pub fn is_more_advanced(&self, a: SubspaceId, b: SubspaceId) -> bool {
        self.advancement_millis(a, b) > 0
    }

    /// Jump the local client into `target` iff it is further along in time
    /// than the current subspace. Returns whether the jump happened. Unknown
    /// subspaces never attract a jump.
    pub fn warp_into_subspace_if_more_advanced(&mut self, target: SubspaceId) -> bool {
        if !self.subspaces.contains_key(&target) {
            return false;
        }
        if !self.is_more_advanced(target, self.current) {
            return false;
        }
        info!(
            "warping from subspace {} into more advanced subspace {} (+{}ms)",
            self.current,
            target,
            self.advancement_millis(target, self.current)
        );
        self.current = target;
        true
    }
}
