use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::workflows::{DocumentType, Role, WorkflowAction, WorkflowStatus};

pub mod commands;

#[derive(Parser)]
#[command(name = "erp-workflow")]
#[command(about = "Inspect and dry-run the document approval workflow")]
#[command(long_about = "Document approval workflow for job orders, proforma job orders and cash \
                       disbursement requests. Lists the actions a role may take, resolves a requested \
                       action into its new status, and validates permission tables.")]
pub struct Cli {
    /// Permission table to use instead of the configured one
    #[arg(long, global = true, help = "Path to a TOML permission table")]
    pub permissions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the actions a role may take on a document in a given status
    Actions {
        #[arg(long, help = "job_order, proforma_job_order or cash_disbursement_request")]
        document_type: DocumentType,
        #[arg(long, help = "draft, pending_check, checked, approved or rejected")]
        status: WorkflowStatus,
        #[arg(long, help = "Role of the acting user, e.g. ops or finance_manager")]
        role: Role,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve an action into its new status without persisting anything
    Perform {
        #[arg(long)]
        document_type: DocumentType,
        #[arg(long)]
        status: WorkflowStatus,
        #[arg(long)]
        role: Role,
        #[arg(long, help = "submit, check, approve or reject")]
        action: WorkflowAction,
        /// Reason, mandatory for reject
        #[arg(long)]
        comment: Option<String>,
        /// Actor id stamped on the resulting transition record
        #[arg(long, default_value = "cli")]
        actor_id: String,
    },
    /// Print the active permission table
    Table {
        #[arg(long, value_enum, default_value_t = TableFormat::Toml)]
        format: TableFormat,
    },
    /// Validate a permission table file
    CheckTable {
        /// File to validate
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Toml,
    Json,
}
