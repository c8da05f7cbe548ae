use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A wall-clock instant expressed as milliseconds since the UNIX epoch.
///
/// Every ownership decision made by the sync layer is stamped with one of
/// these, derived from either the network clock or the computer clock (both
/// possibly offset from true UTC). Arithmetic saturates rather than wraps so
/// that a badly adjusted clock can never make a deadline fire in the past of
/// the epoch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct UtcInstant(i64);

impl UtcInstant {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Duration elapsed since `earlier`, clamped to zero when `earlier` is
    /// actually later than `self`.
    pub fn duration_since(&self, earlier: Self) -> Duration {
        let diff = self.0.saturating_sub(earlier.0);
        if diff <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(diff as u64)
        }
    }

    pub fn offset_by(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

impl Add<Duration> for UtcInstant {
    type Output = UtcInstant;

    fn add(self, rhs: Duration) -> UtcInstant {
        UtcInstant(self.0.saturating_add(rhs.as_millis() as i64))
    }
}

impl Sub<Duration> for UtcInstant {
    type Output = UtcInstant;

    fn sub(self, rhs: Duration) -> UtcInstant {
        UtcInstant(self.0.saturating_sub(rhs.as_millis() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_clamps_to_zero() {
        let early = UtcInstant::from_millis(1_000);
        let late = UtcInstant::from_millis(4_500);

        assert_eq!(late.duration_since(early), Duration::from_millis(3_500));
        assert_eq!(early.duration_since(late), Duration::ZERO);
    }

    #[test]
    fn add_duration_advances_instant() {
        let t = UtcInstant::from_millis(10_000) + Duration::from_millis(500);
        assert_eq!(t.as_millis(), 10_500);
    }

    #[test]
    fn offset_by_accepts_negative_offsets() {
        let t = UtcInstant::from_millis(10_000).offset_by(-2_000);
        assert_eq!(t.as_millis(), 8_000);
    }
}
