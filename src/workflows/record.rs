// Stamping engine outcomes into persistable transition records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine::TransitionOutcome;
use super::types::{DocumentType, Role, WorkflowAction, WorkflowStatus};

/// Caller identity as resolved by the session layer. Trusted as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }
}

/// Source of "now" for stamping transitions
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Everything the caller persists for one transition, including the prior
/// status for audit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub document_id: Uuid,
    pub document_type: DocumentType,
    pub from: WorkflowStatus,
    pub to: WorkflowStatus,
    pub action: WorkflowAction,
    pub actor_id: String,
    pub actor_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub transitioned_at: DateTime<Utc>,
}

impl TransitionOutcome {
    pub fn stamp(
        self,
        document_id: Uuid,
        actor_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> TransitionRecord {
        TransitionRecord {
            document_id,
            document_type: self.document_type,
            from: self.previous_status,
            to: self.new_status,
            action: self.action,
            actor_id: actor_id.into(),
            actor_role: self.actor_role,
            comment: self.comment,
            transitioned_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::engine::WorkflowEngine;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_carries_outcome() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let clock = FixedClock(at);
        let document_id = Uuid::new_v4();

        let outcome = WorkflowEngine::standard()
            .perform_action(
                DocumentType::JobOrder,
                WorkflowStatus::Checked,
                &Role::director(),
                WorkflowAction::Reject,
                Some("budget incomplete"),
            )
            .unwrap();
        let record = outcome.stamp(document_id, "u-42", clock.now());

        assert_eq!(record.document_id, document_id);
        assert_eq!(record.from, WorkflowStatus::Checked);
        assert_eq!(record.to, WorkflowStatus::Rejected);
        assert_eq!(record.actor_id, "u-42");
        assert_eq!(record.actor_role, Role::director());
        assert_eq!(record.comment.as_deref(), Some("budget incomplete"));
        assert_eq!(record.transitioned_at, at);
    }

    #[test]
    fn test_record_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let record = TransitionRecord {
            document_id: Uuid::nil(),
            document_type: DocumentType::ProformaJobOrder,
            from: WorkflowStatus::Draft,
            to: WorkflowStatus::PendingCheck,
            action: WorkflowAction::Submit,
            actor_id: "u-1".to_string(),
            actor_role: Role::ops(),
            comment: None,
            transitioned_at: at,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["from"], "draft");
        assert_eq!(json["to"], "pending_check");
        assert_eq!(json["actor_role"], "ops");
        assert!(json.get("comment").is_none());

        let back: TransitionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
