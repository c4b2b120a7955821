//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use docmorph_core::{Rule, RuleGroup};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Accepted layouts of a rule file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Group(RuleGroup),
    Groups(Vec<RuleGroup>),
    Rules(Vec<Rule>),
}

/// Read an input document, `-` meaning stdin
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        debug!(bytes = data.len(), "Read input from stdin");
        return Ok(data);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let data = fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "Read input file");
    Ok(data)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Load the rule groups in a JSON or YAML rule file
///
/// A bare list of rules becomes one group named after the file stem.
pub fn load_rule_groups(path: &Path) -> Result<Vec<RuleGroup>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    let parsed: RuleFile = if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML rule group, list of rule groups or list of rules".to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON rule group, list of rule groups or list of rules".to_string(),
        })?
    };

    let groups = match parsed {
        RuleFile::Group(group) => vec![group],
        RuleFile::Groups(groups) => groups,
        RuleFile::Rules(rules) => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("rules")
                .to_string();
            vec![RuleGroup::new(stem.clone(), stem, rules)]
        }
    };

    debug!(path = %path.display(), groups = groups.len(), "Loaded rule file");
    Ok(groups)
}

/// Find the rule file for a group id in the configured rules directory
pub fn find_rule_file(group: &str, config: &Config) -> Result<PathBuf> {
    config
        .rule_file_candidates(group)
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| Error::RuleGroupNotFound {
            id: group.to_string(),
            dir: config.paths.rules_dir.clone(),
        })
}

/// Write a document to a file as JSON, or YAML for `.yaml`/`.yml` paths
pub fn save_document(path: &Path, document: &Value, pretty: bool) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(document)?
    } else if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    debug!(path = %path.display(), "Saved document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_single_group_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("group.json");
        fs::write(
            &path,
            r#"{"id": "g", "label": "G", "rules": [{"source": "$.a", "target": "b", "retainPathDepth": 1}]}"#,
        )
        .unwrap();

        let groups = load_rule_groups(&path).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rules[0], Rule::new("$.a", "b").with_retain_path_depth(1));
    }

    #[test]
    fn test_load_group_list_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("groups.yaml");
        fs::write(
            &path,
            "- id: one\n  label: One\n  rules:\n    - source: $.a\n      target: a\n      coerce: bigint\n- id: two\n  label: Two\n",
        )
        .unwrap();

        let groups = load_rule_groups(&path).unwrap();
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["one", "two"]);
        assert!(groups[1].rules.is_empty());
    }

    #[test]
    fn test_load_bare_rules_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invoices.yml");
        fs::write(&path, "- source: $.total\n  target: total\n").unwrap();

        let groups = load_rule_groups(&path).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "invoices");
        assert_eq!(groups[0].label, "invoices");
    }

    #[test]
    fn test_load_invalid_rule_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"rules": 3}"#).unwrap();
        assert!(matches!(load_rule_groups(&path), Err(Error::InvalidFormat { .. })));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_rule_groups(&missing), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_find_rule_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.rules_dir = dir.path().to_path_buf();

        assert!(matches!(
            find_rule_file("orders", &config),
            Err(Error::RuleGroupNotFound { ref id, .. }) if id == "orders"
        ));

        fs::write(dir.path().join("orders.json"), "[]").unwrap();
        assert_eq!(
            find_rule_file("orders", &config).unwrap(),
            dir.path().join("orders.json")
        );
    }

    #[test]
    fn test_save_document() {
        let dir = TempDir::new().unwrap();
        let doc = json!({"a": [1, 2]});

        let json_path = dir.path().join("nested").join("out.json");
        save_document(&json_path, &doc, false).unwrap();
        assert_eq!(fs::read_to_string(&json_path).unwrap(), r#"{"a":[1,2]}"#);

        let yaml_path = dir.path().join("out.yaml");
        save_document(&yaml_path, &doc, true).unwrap();
        let back: Value = serde_yaml::from_str(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_read_input_missing_file() {
        assert!(matches!(
            read_input(Path::new("/definitely/not/here.json")),
            Err(Error::FileNotFound { .. })
        ));
    }
}
