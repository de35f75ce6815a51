//! Review history records.
//!
//! Every applied transition produces one record. Records are append-only:
//! the engine emits them and the embedding application persists them next
//! to the instance's node change, in the same write. Nothing here ever
//! updates or deletes a record.

use chrono::{DateTime, Utc};
use greenlight_core::{HistoryRecordId, UserId};
use serde::{Deserialize, Serialize};

/// One entry in a resource instance's review trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Record ID; ULID ordering keeps trails sortable by creation time.
    pub id: HistoryRecordId,
    /// Caller-scoped identifier of the resource instance acted on.
    pub instance_id: String,
    /// The action that was applied.
    pub action: String,
    /// The user who applied it.
    pub actor: UserId,
    /// Free-form note attached by the actor, if any.
    pub note: Option<String>,
    /// When the transition was applied.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        instance_id: impl Into<String>,
        action: impl Into<String>,
        actor: UserId,
        note: Option<String>,
    ) -> Self {
        Self {
            id: HistoryRecordId::new(),
            instance_id: instance_id.into(),
            action: action.into(),
            actor,
            note,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_captures_fields() {
        let actor = UserId::new();
        let record = HistoryRecord::new("asset-42", "approve", actor, Some("looks good".to_string()));

        assert_eq!(record.instance_id, "asset-42");
        assert_eq!(record.action, "approve");
        assert_eq!(record.actor, actor);
        assert_eq!(record.note.as_deref(), Some("looks good"));
    }

    #[test]
    fn record_is_stamped_at_creation() {
        let before = Utc::now();
        let record = HistoryRecord::new("asset-42", "approve", UserId::new(), None);
        let after = Utc::now();

        assert!(record.recorded_at >= before);
        assert!(record.recorded_at <= after);
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = HistoryRecord::new("kb-7", "reject", UserId::new(), Some("needs sources".to_string()));
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: HistoryRecord = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(record, parsed);
    }
}
