use std::time::SystemTime;

use stellarlink_shared::UtcInstant;

/// Source of raw wall-clock readings. Injected so tests can drive time by
/// hand instead of sleeping.
pub trait TimeSource {
    fn raw_utc_now(&self) -> UtcInstant;
}

/// Default source backed by the operating system clock. A reading before the
/// UNIX epoch collapses to the epoch itself rather than erroring; the sync
/// layer only ever compares instants against each other.
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn raw_utc_now(&self) -> UtcInstant {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        UtcInstant::from_millis(millis)
    }
}

/// The clock service: a "network time" and a "computer time", both derived
/// from one raw source plus independently adjustable offsets.
///
/// The network offset is the NTP-style correction negotiated with the server;
/// the computer offset is a simulated adjustment used to exercise clients
/// whose system clocks disagree. Every ownership decision is stamped with
/// network time; every scheduled continuation fires on computer time.
pub struct SyncClock {
    source: Box<dyn TimeSource>,
    network_offset_millis: i64,
    computer_offset_millis: i64,
}

impl SyncClock {
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        Self {
            source,
            network_offset_millis: 0,
            computer_offset_millis: 0,
        }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemTimeSource))
    }

    pub fn network_utc_now(&self) -> UtcInstant {
        self.source
            .raw_utc_now()
            .offset_by(self.network_offset_millis)
    }

    pub fn computer_utc_now(&self) -> UtcInstant {
        self.source
            .raw_utc_now()
            .offset_by(self.computer_offset_millis)
    }

    pub fn set_network_offset_millis(&mut self, offset: i64) {
        self.network_offset_millis = offset;
    }

    pub fn set_computer_offset_millis(&mut self, offset: i64) {
        self.computer_offset_millis = offset;
    }

    pub fn network_offset_millis(&self) -> i64 {
        self.network_offset_millis
    }

    pub fn computer_offset_millis(&self) -> i64 {
        self.computer_offset_millis
    }
}
