//! Advisor server configuration

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `ADVISOR_API_PORT`
pub const ENV_PREFIX: &str = "ADVISOR";

/// Advisor server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Name reported in structured logs
    pub instance_name: String,

    /// Port for the recommend, health and metrics endpoints
    pub api_port: u16,

    /// Catalog file written by `ia catalog ingest`
    pub catalog_path: PathBuf,

    /// Optional JSON file overriding the built-in rule tables
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

impl AdvisorConfig {
    /// Load configuration from `ADVISOR_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("instance_name", default_instance_name())?
            .set_default("api_port", 8080)?
            .set_default("catalog_path", "catalog.json")?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read advisor configuration")?
            .try_deserialize()
            .context("Invalid advisor configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::from_env(env(&[])).unwrap();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.catalog_path, PathBuf::from("catalog.json"));
        assert!(config.rules_path.is_none());
        assert!(!config.instance_name.is_empty());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AdvisorConfig::from_env(env(&[
            ("ADVISOR_API_PORT", "9100"),
            ("ADVISOR_CATALOG_PATH", "/data/catalog.json"),
            ("ADVISOR_RULES_PATH", "/etc/advisor/rules.json"),
            ("ADVISOR_INSTANCE_NAME", "advisor-1"),
        ]))
        .unwrap();

        assert_eq!(config.api_port, 9100);
        assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.json"));
        assert_eq!(config.rules_path, Some(PathBuf::from("/etc/advisor/rules.json")));
        assert_eq!(config.instance_name, "advisor-1");
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(AdvisorConfig::from_env(env(&[("ADVISOR_API_PORT", "not-a-port")])).is_err());
    }
}
