// file: src/config/loader.rs
// version: 1.1.0
// guid: 4e82b7f0-6c1d-4a93-85e7-f9d04b3c612a

//! Configuration file loading and environment variable substitution

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::DhcpConfig;
use crate::Result;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "PNTADM_CONFIG";

/// System-wide configuration file location
const SYSTEM_CONFIG: &str = "/etc/pntadm/config.yaml";

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load the tool configuration.
    ///
    /// Search order: explicit path, `PNTADM_CONFIG`, the system-wide file,
    /// then the per-user config directory. An explicitly named file must
    /// exist; the search-path candidates are skipped when absent, and the
    /// built-in defaults apply when none is found.
    pub fn load(&self, explicit: Option<&Path>) -> Result<DhcpConfig> {
        let path = match self.locate(explicit) {
            Some(path) => path,
            None => {
                debug!("no configuration file found, using defaults");
                return Ok(DhcpConfig::default());
            }
        };

        debug!("loading configuration from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::PntadmError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let expanded = self.expand_env_vars(&content)?;
        let config: DhcpConfig = serde_yaml::from_str(&expanded)?;
        config.validate()?;

        Ok(config)
    }

    fn locate(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = self.env_vars.get(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let system = PathBuf::from(SYSTEM_CONFIG);
        if system.exists() {
            return Some(system);
        }

        let user = dirs::config_dir()?.join("pntadm").join("config.yaml");
        user.exists().then_some(user)
    }

    /// Expand `${VAR}` environment references in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::PntadmError::config(format!("Invalid regex pattern: {}", e))
        })?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(crate::PntadmError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
