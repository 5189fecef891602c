use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::TransitionOutcome;
use super::types::{DocumentType, Role, WorkflowAction, WorkflowStatus};

/// Why a requested action was refused. All variants are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Role '{role}' may not {action} a {document_type} in status '{status}'")]
    PermissionDenied {
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
        role: Role,
    },
    #[error("Validation failed: {reason}")]
    ValidationError { reason: String },
    /// Only reachable through a misconfigured table
    #[error("No transition defined for '{action}' from status '{status}'")]
    InvalidTransition {
        status: WorkflowStatus,
        action: WorkflowAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    ValidationError,
    InvalidTransition,
}

impl WorkflowError {
    pub(crate) fn reason_required() -> Self {
        WorkflowError::ValidationError {
            reason: "reason required".to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            WorkflowError::ValidationError { .. } => ErrorKind::ValidationError,
            WorkflowError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        }
    }
}

/// Shape handed to the presentation layer: `{ success, new_status?, error? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<WorkflowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl From<&Result<TransitionOutcome, WorkflowError>> for ActionResponse {
    fn from(result: &Result<TransitionOutcome, WorkflowError>) -> Self {
        match result {
            Ok(outcome) => ActionResponse {
                success: true,
                new_status: Some(outcome.new_status),
                error: None,
                error_kind: None,
            },
            Err(e) => ActionResponse {
                success: false,
                new_status: None,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
            },
        }
    }
}

impl From<Result<TransitionOutcome, WorkflowError>> for ActionResponse {
    fn from(result: Result<TransitionOutcome, WorkflowError>) -> Self {
        ActionResponse::from(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_response_shape() {
        let response = ActionResponse::from(Err::<TransitionOutcome, _>(
            WorkflowError::reason_required(),
        ));
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Validation failed: reason required"));
        assert_eq!(response.error_kind, Some(ErrorKind::ValidationError));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_kind"], "validation_error");
        assert!(json.get("new_status").is_none());
    }

    #[test]
    fn test_permission_denied_message() {
        let err = WorkflowError::PermissionDenied {
            document_type: DocumentType::JobOrder,
            status: WorkflowStatus::Checked,
            action: WorkflowAction::Approve,
            role: Role::ops(),
        };
        assert_eq!(
            err.to_string(),
            "Role 'ops' may not approve a job_order in status 'checked'"
        );
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}
