use statig::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use super::record::TransitionRecord;
use super::types::{DocumentType, WorkflowAction, WorkflowStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("Record {index} belongs to document {document_id}, not the one being replayed")]
    ForeignRecord { index: usize, document_id: Uuid },
    #[error(
        "Record {index} ({action}: {from} -> {to}) does not follow from status '{status}'"
    )]
    Inconsistent {
        index: usize,
        status: WorkflowStatus,
        action: WorkflowAction,
        from: WorkflowStatus,
        to: WorkflowStatus,
    },
}

/// Lifecycle of one document, driven by already-decided transition records.
///
/// Records that do not continue from the current state are ignored by the
/// machine; `replay` turns that into a `ReplayError`.
#[derive(Debug)]
pub struct DocumentLifecycle {
    document_id: Uuid,
    document_type: DocumentType,
    status: WorkflowStatus,
    history: Vec<TransitionRecord>,
}

impl DocumentLifecycle {
    pub fn new(document_id: Uuid, document_type: DocumentType) -> Self {
        Self {
            document_id,
            document_type,
            status: WorkflowStatus::INITIAL,
            history: Vec::new(),
        }
    }
}

#[state_machine(initial = "State::draft()")]
impl DocumentLifecycle {
    #[state]
    fn draft(&mut self, event: &TransitionRecord) -> Outcome<State> {
        match self.apply(WorkflowStatus::Draft, event) {
            Some(WorkflowStatus::PendingCheck) => Transition(State::pending_check()),
            _ => Handled,
        }
    }

    #[state]
    fn pending_check(&mut self, event: &TransitionRecord) -> Outcome<State> {
        match self.apply(WorkflowStatus::PendingCheck, event) {
            Some(WorkflowStatus::Checked) => Transition(State::checked()),
            Some(WorkflowStatus::Rejected) => Transition(State::rejected()),
            _ => Handled,
        }
    }

    #[state]
    fn checked(&mut self, event: &TransitionRecord) -> Outcome<State> {
        match self.apply(WorkflowStatus::Checked, event) {
            Some(WorkflowStatus::Approved) => Transition(State::approved()),
            Some(WorkflowStatus::Rejected) => Transition(State::rejected()),
            _ => Handled,
        }
    }

    #[state]
    fn approved(&mut self, event: &TransitionRecord) -> Outcome<State> {
        self.apply(WorkflowStatus::Approved, event);
        Handled
    }

    #[state]
    fn rejected(&mut self, event: &TransitionRecord) -> Outcome<State> {
        self.apply(WorkflowStatus::Rejected, event);
        Handled
    }
}

impl DocumentLifecycle {
    /// Accept `record` if it continues from `current`, returning the new status
    fn apply(&mut self, current: WorkflowStatus, record: &TransitionRecord) -> Option<WorkflowStatus> {
        let follows = record.from == current && record.action.next_status(current) == Some(record.to);
        if !follows {
            tracing::warn!(
                document_id = %self.document_id,
                status = %current,
                action = %record.action,
                from = %record.from,
                to = %record.to,
                "Ignoring transition that does not follow current status"
            );
            return None;
        }

        tracing::debug!(
            document_id = %self.document_id,
            action = %record.action,
            from = %record.from,
            to = %record.to,
            actor_id = %record.actor_id,
            "Replayed transition"
        );
        self.status = record.to;
        self.history.push(record.clone());
        Some(record.to)
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }
}

/// Rebuild a document's status from its transition history
pub fn replay(
    document_id: Uuid,
    document_type: DocumentType,
    records: &[TransitionRecord],
) -> Result<WorkflowStatus, ReplayError> {
    let mut machine = DocumentLifecycle::new(document_id, document_type).state_machine();

    for (index, record) in records.iter().enumerate() {
        if record.document_id != document_id || record.document_type != document_type {
            return Err(ReplayError::ForeignRecord {
                index,
                document_id: record.document_id,
            });
        }

        let applied_before = machine.inner().history().len();
        machine.handle(record);
        if machine.inner().history().len() == applied_before {
            return Err(ReplayError::Inconsistent {
                index,
                status: machine.inner().status(),
                action: record.action,
                from: record.from,
                to: record.to,
            });
        }
    }

    Ok(machine.inner().status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::types::Role;
    use chrono::Utc;

    fn record(
        document_id: Uuid,
        action: WorkflowAction,
        from: WorkflowStatus,
        to: WorkflowStatus,
    ) -> TransitionRecord {
        TransitionRecord {
            document_id,
            document_type: DocumentType::JobOrder,
            from,
            to,
            action,
            actor_id: "u-1".to_string(),
            actor_role: Role::owner(),
            comment: None,
            transitioned_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_is_draft() {
        let status = replay(Uuid::new_v4(), DocumentType::JobOrder, &[]).unwrap();
        assert_eq!(status, WorkflowStatus::Draft);
    }

    #[test]
    fn test_full_approval_history() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let history = vec![
            record(id, Submit, Draft, PendingCheck),
            record(id, Check, PendingCheck, Checked),
            record(id, Approve, Checked, Approved),
        ];
        assert_eq!(replay(id, DocumentType::JobOrder, &history).unwrap(), Approved);
    }

    #[test]
    fn test_rejection_from_pending_check() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let history = vec![
            record(id, Submit, Draft, PendingCheck),
            record(id, Reject, PendingCheck, Rejected),
        ];
        assert_eq!(replay(id, DocumentType::JobOrder, &history).unwrap(), Rejected);
    }

    #[test]
    fn test_skipped_status_is_inconsistent() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let history = vec![
            record(id, Submit, Draft, PendingCheck),
            record(id, Approve, Checked, Approved),
        ];
        assert_eq!(
            replay(id, DocumentType::JobOrder, &history),
            Err(ReplayError::Inconsistent {
                index: 1,
                status: PendingCheck,
                action: Approve,
                from: Checked,
                to: Approved,
            })
        );
    }

    #[test]
    fn test_nothing_leaves_terminal_status() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let history = vec![
            record(id, Submit, Draft, PendingCheck),
            record(id, Reject, PendingCheck, Rejected),
            record(id, Submit, Draft, PendingCheck),
        ];
        assert!(matches!(
            replay(id, DocumentType::JobOrder, &history),
            Err(ReplayError::Inconsistent { index: 2, status: Rejected, .. })
        ));
    }

    #[test]
    fn test_foreign_record() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let history = vec![record(other, Submit, Draft, PendingCheck)];
        assert_eq!(
            replay(id, DocumentType::JobOrder, &history),
            Err(ReplayError::ForeignRecord { index: 0, document_id: other })
        );
    }

    #[test]
    fn test_machine_tracks_history() {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let id = Uuid::new_v4();
        let mut machine = DocumentLifecycle::new(id, DocumentType::JobOrder).state_machine();
        machine.handle(&record(id, Submit, Draft, PendingCheck));
        machine.handle(&record(id, Approve, Checked, Approved));

        assert_eq!(machine.inner().status(), PendingCheck);
        assert_eq!(machine.inner().history().len(), 1);
        assert_eq!(machine.inner().document_id(), id);
    }
}
