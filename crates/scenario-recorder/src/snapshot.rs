// crates/scenario-recorder/src/snapshot.rs
// ============================================================================
// Module: Recorder Snapshot Persistence
// Description: Durable, per-origin recovery state for an in-progress
//              recording.
// Purpose: Let a recording survive a page reload or crash, per `spec.md`
//          §4.3's 24-hour snapshot expiry rule.
// Dependencies: scenario-core, crate::recorder
// ============================================================================

//! ## Overview
//! The recorder itself never touches a filesystem or browser storage API —
//! it hands a [`RecorderSnapshot`] to a host-implemented [`SnapshotStore`]
//! after every buffered action, and restores from one on startup. A snapshot
//! older than 24 hours is treated as stale and discarded rather than resumed
//! (`spec.md` §4.3 edge case: "a snapshot older than 24h is not restored").

use scenario_core::Action;
use scenario_core::ScenarioName;
use scenario_core::Timestamp;

/// Seconds in 24 hours, the snapshot staleness threshold.
const SNAPSHOT_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// A durable checkpoint of an in-progress recording for one origin.
#[derive(Debug, Clone)]
pub struct RecorderSnapshot {
    /// The scenario being recorded.
    pub scenario_name: ScenarioName,
    /// The buffer as of the last checkpoint.
    pub buffer: Vec<Action>,
    /// When this checkpoint was written.
    pub saved_at: Timestamp,
}

impl RecorderSnapshot {
    /// Whether this snapshot is too old to restore, relative to `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        let age = now.as_offset() - self.saved_at.as_offset();
        age.whole_seconds() > SNAPSHOT_MAX_AGE_SECONDS
    }
}

/// Host-implemented durable storage for recorder snapshots, keyed by the
/// page origin the recording is attached to.
///
/// A "clearing" write (`clear_snapshot`) removes any snapshot for `origin`;
/// the recorder calls it after a successful `save` or an explicit `cancel`
/// so a stale snapshot never outlives the recording it checkpointed.
pub trait SnapshotStore {
    /// The error type surfaced by this store's I/O.
    type Error;

    /// Writes (overwriting) the snapshot for `origin`.
    fn save_snapshot(&mut self, origin: &str, snapshot: &RecorderSnapshot) -> Result<(), Self::Error>;

    /// Reads the snapshot for `origin`, if any.
    fn load_snapshot(&self, origin: &str) -> Result<Option<RecorderSnapshot>, Self::Error>;

    /// Removes the snapshot for `origin`, if any.
    fn clear_snapshot(&mut self, origin: &str) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_older_than_24h_is_expired() {
        let saved_at = Timestamp::parse("2026-07-26T00:00:00Z").unwrap();
        let snapshot = RecorderSnapshot {
            scenario_name: ScenarioName::new("x").unwrap(),
            buffer: Vec::new(),
            saved_at,
        };
        let now = Timestamp::parse("2026-07-27T01:00:00Z").unwrap();
        assert!(snapshot.is_expired(now));
    }

    #[test]
    fn snapshot_within_24h_is_not_expired() {
        let saved_at = Timestamp::parse("2026-07-27T00:00:00Z").unwrap();
        let snapshot = RecorderSnapshot {
            scenario_name: ScenarioName::new("x").unwrap(),
            buffer: Vec::new(),
            saved_at,
        };
        let now = Timestamp::parse("2026-07-27T10:00:00Z").unwrap();
        assert!(!snapshot.is_expired(now));
    }
}
