//! Snowflake ID - 64-bit time-ordered identifier
//!
//! Layout (most significant first):
//! - 41 bits: milliseconds since [`Snowflake::EPOCH`]
//! - 10 bits: worker ID
//! - 12 bits: per-millisecond sequence
//!
//! Events, tasks, memberships and assignments are keyed by snowflakes. Clients
//! only ever see them as decimal strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time-ordered 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2025-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_735_689_600_000;

    const WORKER_SHIFT: u32 = 12;
    const TIMESTAMP_SHIFT: u32 = 22;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which this ID was minted
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> Self::TIMESTAMP_SHIFT) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> Self::WORKER_SHIFT) & 0x3FF) as u16
    }

    /// Parse from the decimal string form used on the wire
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SnowflakeParseError::Empty);
        }
        trimmed
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Snowflake)
            .ok_or(SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("identifier is empty")]
    Empty,

    #[error("invalid identifier format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Opaque string on the wire
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Snowflake::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Lock-free Snowflake generator
///
/// Keeps the last issued ID in a single atomic. Each call proposes
/// `max(now_component, last + 1)` and publishes it with a CAS, which keeps IDs
/// strictly increasing per worker even when the clock stalls or steps back.
pub struct SnowflakeGenerator {
    worker_bits: i64,
    last: AtomicI64,
}

impl SnowflakeGenerator {
    /// # Panics
    /// Panics if `worker_id >= 1024`
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_bits: i64::from(worker_id) << Snowflake::WORKER_SHIFT,
            last: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let floor = ((now_millis() - Snowflake::EPOCH) << Snowflake::TIMESTAMP_SHIFT) | self.worker_bits;
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = if floor > last { floor } else { last + 1 };
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Snowflake::new(next),
                Err(observed) => last = observed,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        (self.worker_bits >> Snowflake::WORKER_SHIFT) as u16
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(Snowflake::EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Snowflake::parse("42").unwrap(), Snowflake::new(42));
        assert_eq!(Snowflake::parse(" 42 ").unwrap(), Snowflake::new(42));
        assert_eq!(Snowflake::parse(""), Err(SnowflakeParseError::Empty));
        assert_eq!(Snowflake::parse("abc"), Err(SnowflakeParseError::InvalidFormat));
        assert_eq!(Snowflake::parse("-5"), Err(SnowflakeParseError::InvalidFormat));
        assert_eq!(Snowflake::parse("0"), Err(SnowflakeParseError::InvalidFormat));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Snowflake::new(123_456_789_012_345_678)).unwrap();
        assert_eq!(json, "\"123456789012345678\"");

        let back: Snowflake = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), 123_456_789_012_345_678);
    }

    #[test]
    fn test_generator_is_strictly_increasing() {
        let gen = SnowflakeGenerator::new(3);
        let mut last = Snowflake::default();
        for _ in 0..5000 {
            let id = gen.generate();
            assert!(id > last);
            last = id;
        }
        assert_eq!(gen.worker_id(), 3);
    }

    #[test]
    fn test_generator_embeds_worker_and_time() {
        let before = now_millis();
        let id = SnowflakeGenerator::new(42).generate();
        assert_eq!(id.worker_id(), 42);
        assert!(id.timestamp() >= before);
    }

    #[test]
    fn test_generator_unique_across_threads() {
        let gen = Arc::new(SnowflakeGenerator::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || (0..1000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }
        assert_eq!(ids.len(), 4000);
    }

    #[test]
    #[should_panic(expected = "Worker ID must be < 1024")]
    fn test_generator_invalid_worker_id() {
        SnowflakeGenerator::new(1024);
    }
}
