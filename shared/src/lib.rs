//! # Stellarlink Shared
//! Wire-visible data model shared between the stellarlink client layer and the
//! relay server: vessel identifiers, lock definitions, subspace identifiers,
//! UTC instants and the outbound message schema.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod locks;
mod messages;
mod time;
mod types;
mod vessel;

pub use locks::{LockDefinition, LockError, LockKind};
pub use messages::OutboundMessage;
pub use time::UtcInstant;
pub use types::{PlayerName, SubspaceId};
pub use vessel::{PartId, PersistentId, VesselId, VesselProto};
