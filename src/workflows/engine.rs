// Workflow engine: pure decisions over the permission table
//
// No I/O, no clock, no logging. Callers stamp and persist the outcome.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::WorkflowError;
use super::permissions::PermissionTable;
use super::types::{DocumentType, Role, WorkflowAction, WorkflowStatus};

/// What a successful `perform_action` tells the caller to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub document_type: DocumentType,
    pub previous_status: WorkflowStatus,
    pub new_status: WorkflowStatus,
    pub action: WorkflowAction,
    pub actor_role: Role,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    table: Arc<PermissionTable>,
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl WorkflowEngine {
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(PermissionTable::standard())
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Actions `role` may take on a document of `document_type` in `current_status`.
    ///
    /// Always in display order (submit, check, approve, reject). Empty for
    /// terminal statuses and for anything the table does not mention.
    pub fn available_actions(
        &self,
        document_type: DocumentType,
        current_status: WorkflowStatus,
        role: &Role,
    ) -> Vec<WorkflowAction> {
        if current_status.is_terminal() {
            return Vec::new();
        }

        let mut actions: Vec<WorkflowAction> = self
            .table
            .actions_for(document_type, current_status)
            .filter(|(_, roles)| roles.contains(role))
            .map(|(action, _)| action)
            .collect();
        actions.sort();
        actions
    }

    pub fn is_allowed(
        &self,
        document_type: DocumentType,
        current_status: WorkflowStatus,
        role: &Role,
        action: WorkflowAction,
    ) -> bool {
        self.available_actions(document_type, current_status, role)
            .contains(&action)
    }

    /// Validate `action` and resolve it to the resulting status.
    ///
    /// Checks run in a fixed order: permission, then the reject reason, then
    /// the transition graph. Nothing is mutated, so this doubles as a dry run.
    pub fn perform_action(
        &self,
        document_type: DocumentType,
        current_status: WorkflowStatus,
        role: &Role,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        if !self.is_allowed(document_type, current_status, role, action) {
            return Err(WorkflowError::PermissionDenied {
                document_type,
                status: current_status,
                action,
                role: role.clone(),
            });
        }

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if action.requires_comment() && comment.is_none() {
            return Err(WorkflowError::reason_required());
        }

        let new_status =
            action
                .next_status(current_status)
                .ok_or(WorkflowError::InvalidTransition {
                    status: current_status,
                    action,
                })?;

        Ok(TransitionOutcome {
            document_type,
            previous_status: current_status,
            new_status,
            action,
            actor_role: role.clone(),
            comment,
        })
    }
}
