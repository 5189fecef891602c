use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::workflows::PermissionTable;

/// Main configuration structure for the workflow engine and its tooling
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Where the permission table comes from
    pub permissions: PermissionsConfig,
    /// Audit trail settings
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive, overridden by RUST_LOG
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// TOML permission file; the built-in table is used when unset
    pub table_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// JSON Lines audit file; audit entries stay in memory when unset
    pub log_path: Option<String>,
}

pub const CONFIG_FILE: &str = "erp-workflow.toml";
pub const ENV_PREFIX: &str = "ERP_WORKFLOW";

impl WorkflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. `erp-workflow.toml` in the working directory
    /// 3. Environment variables (`ERP_WORKFLOW__SECTION__KEY`)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(CONFIG_FILE)));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load a specific file, still honouring environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// The configured permission table, or the built-in one
    pub fn permission_table(&self) -> Result<Arc<PermissionTable>> {
        match &self.permissions.table_path {
            Some(path) => {
                let table = PermissionTable::from_file(path)
                    .with_context(|| format!("Invalid permission table {path}"))?;
                tracing::info!(path = %path, rules = table.rule_count(), "Loaded permission table");
                Ok(Arc::new(table))
            }
            None => Ok(PermissionTable::standard()),
        }
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<WorkflowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = WorkflowConfig::load_env_file();
        WorkflowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static WorkflowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
        assert_eq!(config.permissions.table_path, None);
        assert_eq!(config.audit.log_path, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erp-workflow.toml");

        let config = WorkflowConfig {
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: true,
            },
            permissions: PermissionsConfig {
                table_path: Some("permissions.toml".to_string()),
            },
            audit: AuditConfig {
                log_path: Some("audit/transitions.jsonl".to_string()),
            },
        };
        config.save_to_file(&path).unwrap();

        let loaded = WorkflowConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[audit]\nlog_path = \"audit.jsonl\"\n").unwrap();

        let loaded = WorkflowConfig::load_from(&path).unwrap();
        assert_eq!(loaded.audit.log_path.as_deref(), Some("audit.jsonl"));
        assert_eq!(loaded.observability.log_level, "info");
    }

    #[test]
    fn test_default_permission_table_is_standard() {
        let table = WorkflowConfig::default().permission_table().unwrap();
        assert!(Arc::ptr_eq(&table, &PermissionTable::standard()));
    }

    #[test]
    fn test_missing_permission_file() {
        let config = WorkflowConfig {
            permissions: PermissionsConfig {
                table_path: Some("/nonexistent/permissions.toml".to_string()),
            },
            ..Default::default()
        };
        assert!(config.permission_table().is_err());
    }
}
