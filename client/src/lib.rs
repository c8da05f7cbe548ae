//! # Stellarlink Client
//! The synchronization layer embedded in the game client. It reacts to
//! game-level events (docking, undocking, part-count changes, science
//! events), arbitrates vessel ownership through the lock registry, reconciles
//! the local time-warp subspace with the authoritative player's, and hands
//! outbound state to the relay server through a `MessageSender` capability.
//!
//! The layer is single-threaded and cooperative: every delay is a scheduled
//! continuation resumed by [`SyncLayer::tick`], never a blocked thread.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod config;
mod diagnostics;
mod dock;
mod engine;
mod events;
mod locks;
mod proto;
mod remove;
mod scheduler;
mod sender;
mod time;
mod warp;
mod world;

pub use config::SyncConfig;
pub use diagnostics::SyncDiagnostics;
pub use engine::SyncLayer;
pub use events::{GameEvent, GameScene, SubscriptionHandle};
pub use locks::LockRegistry;
pub use sender::MessageSender;
pub use time::{SyncClock, SystemTimeSource, TimeSource};
pub use warp::SubspaceCoordinator;
pub use world::{
    fakes::{FakeGameWorld, ManualTimeSource, RecordingSender},
    GameWorld, VesselInfo,
};
