// Core vocabulary of the document approval workflow

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown document type '{0}'")]
    DocumentType(String),
    #[error("unknown workflow status '{0}'")]
    Status(String),
    #[error("unknown workflow action '{0}'")]
    Action(String),
    #[error("role name must not be empty")]
    EmptyRole,
}

/// Kinds of business documents that go through approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ProformaJobOrder,
    JobOrder,
    CashDisbursementRequest,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::ProformaJobOrder,
        DocumentType::JobOrder,
        DocumentType::CashDisbursementRequest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::ProformaJobOrder => "proforma_job_order",
            DocumentType::JobOrder => "job_order",
            DocumentType::CashDisbursementRequest => "cash_disbursement_request",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DocumentType::ALL
            .into_iter()
            .find(|dt| dt.as_str() == normalized)
            .ok_or_else(|| ParseError::DocumentType(s.to_string()))
    }
}

/// Approval stage of a single document.
///
/// `Draft` is the initial status. `Approved` and `Rejected` are terminal:
/// nothing leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Draft,
    PendingCheck,
    Checked,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 5] = [
        WorkflowStatus::Draft,
        WorkflowStatus::PendingCheck,
        WorkflowStatus::Checked,
        WorkflowStatus::Approved,
        WorkflowStatus::Rejected,
    ];

    pub const INITIAL: WorkflowStatus = WorkflowStatus::Draft;

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::Approved | WorkflowStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::PendingCheck => "pending_check",
            WorkflowStatus::Checked => "checked",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        WorkflowStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseError::Status(s.to_string()))
    }
}

/// Verbs a caller may request. Variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    Check,
    Approve,
    Reject,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 4] = [
        WorkflowAction::Submit,
        WorkflowAction::Check,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
    ];

    /// The status this action leads to from `from`, if the edge exists
    pub fn next_status(self, from: WorkflowStatus) -> Option<WorkflowStatus> {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        match (from, self) {
            (Draft, Submit) => Some(PendingCheck),
            (PendingCheck, Check) => Some(Checked),
            (Checked, Approve) => Some(Approved),
            (PendingCheck | Checked, Reject) => Some(Rejected),
            _ => None,
        }
    }

    pub fn requires_comment(self) -> bool {
        matches!(self, WorkflowAction::Reject)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::Submit => "submit",
            WorkflowAction::Check => "check",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        WorkflowAction::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ParseError::Action(s.to_string()))
    }
}

/// Organisational role of an actor, used only for permission checks.
///
/// Roles are configuration, so this is an open set of normalised names
/// rather than an enum. The well-known roles are provided as constructors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub const OPS: &'static str = "ops";
    pub const FINANCE_MANAGER: &'static str = "finance_manager";
    pub const ADMINISTRATION: &'static str = "administration";
    pub const OWNER: &'static str = "owner";
    pub const DIRECTOR: &'static str = "director";

    pub const KNOWN: [&'static str; 5] = [
        Role::OPS,
        Role::FINANCE_MANAGER,
        Role::ADMINISTRATION,
        Role::OWNER,
        Role::DIRECTOR,
    ];

    pub fn new(name: impl AsRef<str>) -> Result<Self, ParseError> {
        let normalized = name.as_ref().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ParseError::EmptyRole);
        }
        Ok(Self(normalized))
    }

    /// For names already known to be normalised
    pub(crate) fn from_normalized(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn ops() -> Self {
        Self(Role::OPS.to_string())
    }

    pub fn finance_manager() -> Self {
        Self(Role::FINANCE_MANAGER.to_string())
    }

    pub fn administration() -> Self {
        Self(Role::ADMINISTRATION.to_string())
    }

    pub fn owner() -> Self {
        Self(Role::OWNER.to_string())
    }

    pub fn director() -> Self {
        Self(Role::DIRECTOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::new(s)
    }
}

impl TryFrom<String> for Role {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::new(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}
