/// Identifier of one subspace (an independent simulated-time stream created
/// by per-client time-warp). Several clients may share a subspace.
pub type SubspaceId = i32;

/// Name a client authenticated with. Doubles as the holder field of locks.
pub type PlayerName = String;
