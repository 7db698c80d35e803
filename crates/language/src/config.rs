use std::{env, path::PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pipelines recognized by applications that neither declare nor inherit any.
pub const DEFAULT_PIPELINES: [&str; 6] = ["analyze", "archive", "mirror", "setup", "pushtocache", "execute"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub default_pipelines: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_pipelines: DEFAULT_PIPELINES.iter().map(|pipeline| pipeline.to_string()).collect(),
        }
    }
}

impl LanguageConfig {
    /// Loads the configuration from [`default_config_path`], falling back
    /// to defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return LanguageConfig::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable language config");
                LanguageConfig::default()
            }
        }
    }
}

/// Get the default path for the language configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var("RAMBLE_CONFIG_PATH")
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ramble")
        .join("config.json")
}

fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let config = LanguageConfig::load_from_path(&temp_dir.path().join("absent.json"));
        assert_eq!(config, LanguageConfig::default());
        assert!(config.default_pipelines.iter().any(|pipeline| pipeline == "setup"));
    }

    #[test]
    fn file_overrides_default_pipelines() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_pipelines": ["setup", "execute"] }"#).expect("write config");

        let config = LanguageConfig::load_from_path(&path);
        assert_eq!(config.default_pipelines, vec!["setup", "execute"]);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write config");

        assert_eq!(LanguageConfig::load_from_path(&path), LanguageConfig::default());
    }

    #[test]
    fn tilde_expands_to_home() {
        let expanded = expand_tilde("~/ramble/config.json");
        assert!(expanded.ends_with("ramble/config.json"));
        if let Some(home) = home_dir() {
            assert!(expand_tilde("~\\ramble\\config.json").starts_with(home));
        }
        assert_eq!(expand_tilde("/etc/ramble.json"), PathBuf::from("/etc/ramble.json"));
    }
}
