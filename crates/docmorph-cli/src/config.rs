//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - The `DOCMORPH_CONFIG` environment variable (via the `--config` flag)

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base names probed in the working directory
const LOCAL_CONFIG_FILES: [&str; 4] = [
    ".docmorph.yaml",
    ".docmorph.yml",
    ".docmorph.json",
    ".docmorph.toml",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extractor used when a command does not name one
    pub default_extractor: Option<String>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSection,

    /// Path settings
    pub paths: PathConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Pretty-print JSON written with `--save-to`
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// Path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding `<group>.yaml|yml|json` rule files
    pub rules_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            pretty: true,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("rules"),
        }
    }
}

impl Config {
    /// Load configuration from a file, choosing the parser by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported configuration file {}: expected .yaml, .yml, .json or .toml",
                    path.display()
                )))
            }
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = LOCAL_CONFIG_FILES.iter().map(PathBuf::from).collect();

        if let Some(config_dir) = dirs::config_dir() {
            let docmorph_dir = config_dir.join("docmorph");
            for name in ["config.yaml", "config.yml", "config.json", "config.toml"] {
                paths.push(docmorph_dir.join(name));
            }
        }

        paths
    }

    /// Candidate rule files for a group id in the rules directory
    pub fn rule_file_candidates(&self, group: &str) -> Vec<PathBuf> {
        ["yaml", "yml", "json"]
            .iter()
            .map(|ext| self.paths.rules_dir.join(format!("{}.{}", group, ext)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.default_extractor.is_none());
        assert_eq!(config.output.format, OutputFormat::Human);
        assert_eq!(config.paths.rules_dir, PathBuf::from("rules"));
    }

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "default_extractor: jsonpath\noutput:\n  format: json-pretty\npaths:\n  rules_dir: /etc/docmorph/rules\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_extractor.as_deref(), Some("jsonpath"));
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(config.output.pretty);
        assert_eq!(config.paths.rules_dir, PathBuf::from("/etc/docmorph/rules"));
    }

    #[test]
    fn test_toml_and_json_config() {
        let dir = TempDir::new().unwrap();

        let toml_path = dir.path().join("config.toml");
        fs::write(&toml_path, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n").unwrap();
        let config = Config::from_file(&toml_path).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));

        let json_path = dir.path().join("config.json");
        fs::write(&json_path, r#"{"output": {"format": "yaml", "pretty": false}}"#).unwrap();
        let config = Config::from_file(&json_path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_bad_config_files() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(Config::from_file(&missing), Err(Error::FileNotFound { .. })));

        let ini = dir.path().join("config.ini");
        fs::write(&ini, "x=1").unwrap();
        assert!(matches!(Config::from_file(&ini), Err(Error::Config(_))));

        let broken = dir.path().join("config.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(Config::from_file(&broken), Err(Error::Json(_))));
    }

    #[test]
    fn test_rule_file_candidates() {
        let mut config = Config::default();
        config.paths.rules_dir = PathBuf::from("/rules");
        assert_eq!(
            config.rule_file_candidates("orders"),
            vec![
                PathBuf::from("/rules/orders.yaml"),
                PathBuf::from("/rules/orders.yml"),
                PathBuf::from("/rules/orders.json"),
            ]
        );
    }
}
