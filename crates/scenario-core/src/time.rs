// crates/scenario-core/src/time.rs
// ============================================================================
// Module: Scenario Forge Time
// Description: Wall-clock timestamps and monotonic recording order.
// Purpose: Provide ISO-8601 UTC timestamps for documents and a strictly
//          increasing ordering key for recorded actions.
// Dependencies: time, serde
// ============================================================================

//! ## Overview
//! Two distinct notions of time appear in this system: [`Timestamp`], an
//! ISO-8601 UTC wall-clock instant used on `created_at`/`updated_at` fields
//! (`spec.md` §6), and [`RecordingTimestamp`], a monotonically increasing
//! counter used only to order actions during optimisation (`spec.md` §3).
//! They are never interchangeable.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// An ISO-8601 UTC wall-clock timestamp.
///
/// # Invariants
/// - Always UTC; offsets other than zero are normalized on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Wraps an [`OffsetDateTime`], normalizing it to UTC.
    #[must_use]
    pub fn from_offset(dt: OffsetDateTime) -> Self {
        Self(dt.to_offset(time::UtcOffset::UTC))
    }

    /// Returns the underlying `OffsetDateTime`.
    #[must_use]
    pub const fn as_offset(&self) -> OffsetDateTime {
        self.0
    }

    /// Parses an RFC 3339 string into a [`Timestamp`].
    ///
    /// # Errors
    ///
    /// Returns a [`time::error::Parse`] when `raw` is not valid RFC 3339.
    pub fn parse(raw: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(raw, &Rfc3339).map(Self::from_offset)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("<unrepresentable-timestamp>"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let formatted = self
            .0
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A strictly increasing counter used to order actions during recording.
///
/// This is not wall-clock time: it only needs to be monotonic within one
/// recording session, per `spec.md` §3 ("used only for ordering during
/// optimisation").
///
/// # Invariants
/// - Comparisons between two recording timestamps are only meaningful within
///   the same recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingTimestamp(u64);

impl RecordingTimestamp {
    /// Wraps a raw monotonic tick value.
    #[must_use]
    pub const fn new(tick: u64) -> Self {
        Self(tick)
    }

    /// Returns the raw tick value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing [`RecordingTimestamp`] values for one
/// recording session.
#[derive(Debug, Default)]
pub struct RecordingClock {
    /// Next tick to hand out.
    next: u64,
}

impl RecordingClock {
    /// Creates a clock starting at tick zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the next [`RecordingTimestamp`], advancing the clock.
    pub fn tick(&mut self) -> RecordingTimestamp {
        let ts = RecordingTimestamp::new(self.next);
        self.next += 1;
        ts
    }
}
