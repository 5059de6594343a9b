//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level proctor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Default test duration in minutes when `--minutes` is not given.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Output directory for report artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_minutes() -> u32 {
    20
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./proctor-results")
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `proctor.toml` in the current directory
/// 2. `~/.config/proctor/config.toml`
///
/// Environment variable override: `PROCTOR_MINUTES`.
pub fn load_config_from(path: Option<&Path>) -> Result<ProctorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("proctor.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ProctorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ProctorConfig::default(),
    };

    if let Ok(minutes) = std::env::var("PROCTOR_MINUTES") {
        let minutes: u32 = minutes
            .parse()
            .context("PROCTOR_MINUTES must be a positive integer")?;
        anyhow::ensure!(minutes >= 1, "PROCTOR_MINUTES must be at least 1");
        config.default_minutes = minutes;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("proctor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ProctorConfig::default();
        assert_eq!(config.default_minutes, 20);
        assert_eq!(config.output_dir, PathBuf::from("./proctor-results"));
    }

    #[test]
    fn parse_config() {
        let toml_str = r#"
default_minutes = 45
output_dir = "./reports"
"#;
        let config: ProctorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_minutes, 45);
        assert_eq!(config.output_dir, PathBuf::from("./reports"));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ProctorConfig = toml::from_str("default_minutes = 5").unwrap();
        assert_eq!(config.default_minutes, 5);
        assert_eq!(config.output_dir, PathBuf::from("./proctor-results"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("no_such_config.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proctor.toml");
        std::fs::write(&path, "default_minutes = 3").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_minutes, 3);
    }
}
