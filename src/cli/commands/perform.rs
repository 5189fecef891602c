use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::Command;
use crate::workflows::{
    ActionResponse, DocumentType, Role, TransitionRecord, WorkflowAction, WorkflowEngine,
    WorkflowStatus,
};

pub struct PerformCommand {
    pub engine: WorkflowEngine,
    pub document_type: DocumentType,
    pub status: WorkflowStatus,
    pub role: Role,
    pub action: WorkflowAction,
    pub comment: Option<String>,
    pub actor_id: String,
}

#[derive(Serialize)]
struct PerformOutput {
    #[serde(flatten)]
    response: ActionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<TransitionRecord>,
}

impl Command for PerformCommand {
    fn execute(&self) -> Result<()> {
        let result = self.engine.perform_action(
            self.document_type,
            self.status,
            &self.role,
            self.action,
            self.comment.as_deref(),
        );
        let response = ActionResponse::from(&result);

        match result {
            Ok(outcome) => {
                // No document exists here, so the record gets a throwaway id
                let record = outcome.stamp(Uuid::new_v4(), self.actor_id.as_str(), Utc::now());
                let output = PerformOutput {
                    response,
                    record: Some(record),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }
            Err(e) => {
                let output = PerformOutput {
                    response,
                    record: None,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
                Err(e.into())
            }
        }
    }
}
