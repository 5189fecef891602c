use anyhow::Result;
use clap::Parser;

use erp_workflow::cli::commands::{
    actions::ActionsCommand, build_engine, check_table::CheckTableCommand,
    perform::PerformCommand, show_usage, table::TableCommand, Command,
};
use erp_workflow::cli::{Cli, Commands};
use erp_workflow::config::config;
use erp_workflow::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config()?;
    init_telemetry(&config.observability)?;

    let Some(command) = cli.command else {
        return show_usage();
    };

    let engine = || build_engine(config, cli.permissions.as_deref());

    match command {
        Commands::Actions {
            document_type,
            status,
            role,
            json,
        } => ActionsCommand {
            engine: engine()?,
            document_type,
            status,
            role,
            json,
        }
        .execute(),
        Commands::Perform {
            document_type,
            status,
            role,
            action,
            comment,
            actor_id,
        } => PerformCommand {
            engine: engine()?,
            document_type,
            status,
            role,
            action,
            comment,
            actor_id,
        }
        .execute(),
        Commands::Table { format } => TableCommand {
            engine: engine()?,
            format,
        }
        .execute(),
        Commands::CheckTable { path } => CheckTableCommand { path }.execute(),
    }
}
