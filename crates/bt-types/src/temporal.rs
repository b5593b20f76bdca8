use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock instant with nanosecond resolution.
///
/// Rendered as the decimal count of nanoseconds since the UNIX epoch. That
/// decimal string is what goes into transaction-id and block hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    nanos: u64,
}

impl Timestamp {
    /// Create a timestamp from nanoseconds since the UNIX epoch.
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self {
            nanos: u64::try_from(nanos).unwrap_or(u64::MAX),
        }
    }

    /// The current time, bumped so that it is strictly after `previous`.
    ///
    /// Keeps time-salted ids distinct when the clock is coarse or steps back.
    pub fn now_after(previous: Option<Self>) -> Self {
        let now = Self::now();
        match previous {
            Some(prev) if now <= prev => Self {
                nanos: prev.nanos.saturating_add(1),
            },
            _ => now,
        }
    }

    /// Nanoseconds since the UNIX epoch.
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Decimal rendering used as hash input.
    pub fn to_decimal(&self) -> String {
        self.nanos.to_string()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.nanos)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        let ts = Timestamp::now();
        // After 2020-01-01.
        assert!(ts.as_nanos() > 1_577_836_800_000_000_000);
    }

    #[test]
    fn now_after_is_strictly_later() {
        let future = Timestamp::from_nanos(u64::MAX - 10);
        let next = Timestamp::now_after(Some(future));
        assert_eq!(next.as_nanos(), u64::MAX - 9);

        let ts = Timestamp::now_after(None);
        assert!(Timestamp::now_after(Some(ts)) > ts);
    }

    #[test]
    fn decimal_rendering() {
        let ts = Timestamp::from_nanos(1_600_000_000_123_456_789);
        assert_eq!(ts.to_decimal(), "1600000000123456789");
        assert_eq!(format!("{ts}"), ts.to_decimal());
    }

    #[test]
    fn ordering_follows_nanos() {
        assert!(Timestamp::from_nanos(1) < Timestamp::from_nanos(2));
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::from_nanos(1234567890);
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
