mod clock;

pub use clock::{SyncClock, SystemTimeSource, TimeSource};
