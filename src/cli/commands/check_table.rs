use anyhow::{Context, Result};
use std::path::PathBuf;

use super::Command;
use crate::workflows::PermissionTable;

pub struct CheckTableCommand {
    pub path: PathBuf,
}

impl Command for CheckTableCommand {
    fn execute(&self) -> Result<()> {
        let table = PermissionTable::from_file(&self.path)
            .with_context(|| format!("❌ {} is not a valid permission table", self.path.display()))?;

        println!(
            "✅ {} is valid: {} rules",
            self.path.display(),
            table.rule_count()
        );
        Ok(())
    }
}
