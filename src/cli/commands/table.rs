use anyhow::Result;

use super::Command;
use crate::cli::TableFormat;
use crate::workflows::WorkflowEngine;

pub struct TableCommand {
    pub engine: WorkflowEngine,
    pub format: TableFormat,
}

impl Command for TableCommand {
    fn execute(&self) -> Result<()> {
        let table = self.engine.table();
        match self.format {
            TableFormat::Toml => print!("{}", table.to_toml_string()?),
            TableFormat::Json => println!("{}", serde_json::to_string_pretty(&table.to_config())?),
        }
        Ok(())
    }
}
