// Configuration loading for ossflow

use anyhow::{Context, Result};
use ossflow::cfg::TypeOptions;
use ossflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fs;
use std::path::{Path, PathBuf};

/// ossflow configuration
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct OssflowConfig {
    /// Workflow inputs (credentials, container, probes)
    pub workflow: WorkflowConfig,

    /// AuthClient implementation
    #[default(TypeOptions::new("MemoryAuthClient", serde_json::json!({})))]
    pub auth_client: TypeOptions,

    /// StorageClient implementation
    #[default(TypeOptions::new("MemoryStorageClient", serde_json::json!({})))]
    pub storage_client: TypeOptions,

    /// Log level used when RUST_LOG is not set
    #[default = "info"]
    pub log_level: String,
}

impl OssflowConfig {
    /// Load configuration from file
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = match config_path {
            Some(p) => PathBuf::from(shellexpand::tilde(p).to_string()),
            None => Self::default_config_path()?,
        };

        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Config file not found: {}. Please create it first.",
                path.display()
            ));
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        Self::parse(&path, &expanded_content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get default config path (~/.ossflow/config.yaml)
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".ossflow").join("config.yaml"))
    }

    /// Parse content by file extension, YAML when unknown
    fn parse(path: &Path, content: &str) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match ext.as_deref() {
            Some("json") | Some("json5") => json5::from_str(content)?,
            Some("toml") => toml::from_str(content)?,
            _ => serde_yaml::from_str(content)?,
        };

        Ok(config)
    }

    /// Expand environment variables in the format ${VAR_NAME}
    fn expand_env_vars(content: &str) -> String {
        let re = match regex_lite::Regex::new(r"\$\{([^}]+)\}") {
            Ok(re) => re,
            Err(_) => return content.to_string(),
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let full_match = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(full_match, &value);
            }
        }

        result
    }
}
