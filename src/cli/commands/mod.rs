use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::WorkflowConfig;
use crate::workflows::{PermissionTable, WorkflowEngine};

pub mod actions;
pub mod check_table;
pub mod perform;
pub mod table;

pub trait Command {
    fn execute(&self) -> Result<()>;
}

/// Engine over the table given on the command line, else the configured one
pub fn build_engine(config: &WorkflowConfig, override_path: Option<&Path>) -> Result<WorkflowEngine> {
    let table = match override_path {
        Some(path) => Arc::new(PermissionTable::from_file(path)?),
        None => config.permission_table()?,
    };
    Ok(WorkflowEngine::new(table))
}

pub fn show_usage() -> Result<()> {
    println!("📋 erp-workflow - document approval workflow");
    println!();
    println!("Commands:");
    println!("  🔎 erp-workflow actions      # What can this role do here?");
    println!("  ▶️  erp-workflow perform      # Dry-run an action");
    println!("  📜 erp-workflow table        # Show the permission table");
    println!("  ✅ erp-workflow check-table  # Validate a permission file");
    println!();
    println!("💡 Example: erp-workflow actions --document-type job_order --status draft --role ops");
    Ok(())
}
