// Permission table: (document type, status) -> action -> allowed roles
//
// Built and validated once, then shared read-only behind an Arc.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use super::types::{DocumentType, Role, WorkflowAction, WorkflowStatus};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read permission file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid permission file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to render permission table: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("Rule {document_type}/{status}/{action}: {status} is terminal and cannot carry actions")]
    TerminalStatus {
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
    },
    #[error("Rule {document_type}/{status}/{action}: '{action}' has no successor from '{status}'")]
    UndefinedTransition {
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
    },
    #[error("Rule {document_type}/{status}/{action}: no roles listed")]
    EmptyRoleSet {
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
    },
    #[error("Rule {document_type}/{status}/{action} is defined more than once")]
    DuplicateRule {
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
    },
}

/// One line of the declarative permission file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub document_type: DocumentType,
    pub status: WorkflowStatus,
    pub action: WorkflowAction,
    pub roles: Vec<Role>,
}

/// Serialized form of a permission table
///
/// ```toml
/// [[rule]]
/// document_type = "job_order"
/// status = "draft"
/// action = "submit"
/// roles = ["ops", "administration"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    #[serde(rename = "rule", default)]
    pub rules: Vec<PermissionRule>,
}

type ActionRoles = BTreeMap<WorkflowAction, BTreeSet<Role>>;

/// Immutable mapping from (document type, status) to the actions each role may take.
///
/// A table can only be obtained through validation, so every action it holds
/// has a defined successor status and non-empty role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTable {
    entries: BTreeMap<(DocumentType, WorkflowStatus), ActionRoles>,
}

static STANDARD_TABLE: LazyLock<Arc<PermissionTable>> =
    LazyLock::new(|| Arc::new(PermissionTable::build_standard()));

impl PermissionTable {
    /// The built-in table shared by every caller that does not configure its own
    pub fn standard() -> Arc<PermissionTable> {
        Arc::clone(&STANDARD_TABLE)
    }

    pub fn from_config(config: PermissionConfig) -> Result<Self, TableError> {
        let mut entries: BTreeMap<(DocumentType, WorkflowStatus), ActionRoles> = BTreeMap::new();

        for rule in config.rules {
            let PermissionRule { document_type, status, action, roles } = rule;

            if status.is_terminal() {
                return Err(TableError::TerminalStatus { document_type, status, action });
            }
            if action.next_status(status).is_none() {
                return Err(TableError::UndefinedTransition { document_type, status, action });
            }
            if roles.is_empty() {
                return Err(TableError::EmptyRoleSet { document_type, status, action });
            }

            let actions = entries.entry((document_type, status)).or_default();
            if actions.contains_key(&action) {
                return Err(TableError::DuplicateRule { document_type, status, action });
            }
            actions.insert(action, roles.into_iter().collect());
        }

        Ok(Self { entries })
    }

    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let config: PermissionConfig = toml::from_str(source)?;
        Self::from_config(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render back to the declarative form, in deterministic order
    pub fn to_config(&self) -> PermissionConfig {
        let rules = self
            .rules()
            .map(|(document_type, status, action, roles)| PermissionRule {
                document_type,
                status,
                action,
                roles: roles.iter().cloned().collect(),
            })
            .collect();
        PermissionConfig { rules }
    }

    pub fn to_toml_string(&self) -> Result<String, TableError> {
        Ok(toml::to_string_pretty(&self.to_config())?)
    }

    /// Actions defined for (document type, status), in display order
    pub fn actions_for(
        &self,
        document_type: DocumentType,
        status: WorkflowStatus,
    ) -> impl Iterator<Item = (WorkflowAction, &BTreeSet<Role>)> + '_ {
        self.entries
            .get(&(document_type, status))
            .into_iter()
            .flat_map(|actions| actions.iter().map(|(action, roles)| (*action, roles)))
    }

    pub fn roles_for(
        &self,
        document_type: DocumentType,
        status: WorkflowStatus,
        action: WorkflowAction,
    ) -> Option<&BTreeSet<Role>> {
        self.entries.get(&(document_type, status))?.get(&action)
    }

    pub fn rules(
        &self,
    ) -> impl Iterator<Item = (DocumentType, WorkflowStatus, WorkflowAction, &BTreeSet<Role>)> + '_ {
        self.entries.iter().flat_map(|((document_type, status), actions)| {
            actions
                .iter()
                .map(move |(action, roles)| (*document_type, *status, *action, roles))
        })
    }

    pub fn rule_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn build_standard() -> Self {
        use WorkflowAction::*;
        use WorkflowStatus::*;

        let mut entries: BTreeMap<(DocumentType, WorkflowStatus), ActionRoles> = BTreeMap::new();
        let mut allow = |document_type, status, action, roles: &[&str]| {
            let roles = roles.iter().map(|name| Role::from_normalized(name)).collect();
            entries.entry((document_type, status)).or_default().insert(action, roles);
        };

        let approvers = [Role::OWNER, Role::DIRECTOR];
        let checkers_and_approvers = [Role::FINANCE_MANAGER, Role::OWNER, Role::DIRECTOR];

        let job_order = DocumentType::JobOrder;
        allow(job_order, Draft, Submit, &[Role::OPS, Role::ADMINISTRATION]);
        allow(job_order, PendingCheck, Check, &[Role::FINANCE_MANAGER]);
        allow(job_order, PendingCheck, Reject, &checkers_and_approvers);
        allow(job_order, Checked, Approve, &approvers);
        allow(job_order, Checked, Reject, &approvers);

        let proforma = DocumentType::ProformaJobOrder;
        allow(proforma, Draft, Submit, &[Role::OPS, Role::ADMINISTRATION]);
        allow(proforma, PendingCheck, Check, &[Role::FINANCE_MANAGER, Role::ADMINISTRATION]);
        allow(proforma, PendingCheck, Reject, &checkers_and_approvers);
        allow(proforma, Checked, Approve, &approvers);
        allow(proforma, Checked, Reject, &approvers);

        let disbursement = DocumentType::CashDisbursementRequest;
        allow(
            disbursement,
            Draft,
            Submit,
            &[Role::OPS, Role::ADMINISTRATION, Role::FINANCE_MANAGER],
        );
        allow(disbursement, PendingCheck, Check, &[Role::FINANCE_MANAGER]);
        allow(disbursement, PendingCheck, Reject, &checkers_and_approvers);
        allow(disbursement, Checked, Approve, &approvers);
        allow(disbursement, Checked, Reject, &approvers);

        Self { entries }
    }
}
