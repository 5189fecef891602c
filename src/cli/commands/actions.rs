use anyhow::Result;

use super::Command;
use crate::workflows::{DocumentType, Role, WorkflowEngine, WorkflowStatus};

pub struct ActionsCommand {
    pub engine: WorkflowEngine,
    pub document_type: DocumentType,
    pub status: WorkflowStatus,
    pub role: Role,
    pub json: bool,
}

impl Command for ActionsCommand {
    fn execute(&self) -> Result<()> {
        let actions = self
            .engine
            .available_actions(self.document_type, self.status, &self.role);
        tracing::debug!(
            document_type = %self.document_type,
            status = %self.status,
            role = %self.role,
            count = actions.len(),
            "Resolved available actions"
        );

        if self.json {
            println!("{}", serde_json::to_string(&actions)?);
            return Ok(());
        }

        println!(
            "📄 {} in '{}' as '{}':",
            self.document_type, self.status, self.role
        );
        if actions.is_empty() {
            if self.status.is_terminal() {
                println!("   🔒 '{}' is terminal, no further actions", self.status);
            } else {
                println!("   ⛔ No actions available for this role");
            }
        } else {
            for action in actions {
                println!("   ▶️  {}", action);
            }
        }
        Ok(())
    }
}
