//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::QuizOptions;
use crate::grading::MatchMode;

/// `[grading]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// When set, overrides the mode stored in an existing session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<MatchMode>,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Prefix CSV files with a UTF-8 byte-order mark.
    #[serde(default = "default_bom")]
    pub bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { bom: default_bom() }
    }
}

/// Top-level trigrade configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrigradeConfig {
    /// Where the session snapshot lives.
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
    /// Default directory for exports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default quiz generation options.
    #[serde(default)]
    pub quiz: QuizOptions,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_bom() -> bool {
    true
}
fn default_session_path() -> PathBuf {
    PathBuf::from("trigrade-session.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./trigrade-export")
}

impl Default for TrigradeConfig {
    fn default() -> Self {
        Self {
            session_path: default_session_path(),
            output_dir: default_output_dir(),
            quiz: QuizOptions::default(),
            grading: GradingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Sample configuration written by `trigrade init`.
pub const SAMPLE_CONFIG: &str = r#"# trigrade configuration
session_path = "trigrade-session.json"
output_dir = "./trigrade-export"

[quiz]
seed = 42
item_count = 10
topics = ["triangle_angle_sum", "exterior_angle", "triangle_types", "congruence", "similarity_basic"]
varied_formats = false

[grading]
# "exact" compares raw strings, "numeric" also accepts 45 for 45.0.
# Unset keeps the mode the session was created with (exact for new ones).
# match_mode = "numeric"

[export]
bom = true
"#;

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `trigrade.toml` in the current directory
/// 2. `~/.config/trigrade/config.toml`
///
/// Environment variable overrides: `TRIGRADE_SEED`, `TRIGRADE_SESSION`.
pub fn load_config() -> Result<TrigradeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TrigradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("trigrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TrigradeConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse a config document.
pub fn parse_config(content: &str) -> Result<TrigradeConfig> {
    Ok(toml::from_str::<TrigradeConfig>(content)?)
}

fn apply_env_overrides<F>(config: &mut TrigradeConfig, var: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(seed) = var("TRIGRADE_SEED") {
        config.quiz.seed = seed
            .trim()
            .parse()
            .with_context(|| format!("TRIGRADE_SEED is not an integer: {seed}"))?;
    }
    if let Some(session) = var("TRIGRADE_SESSION") {
        config.session_path = PathBuf::from(session);
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("trigrade"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Topic;

    #[test]
    fn default_config() {
        let config = TrigradeConfig::default();
        assert_eq!(config.quiz.seed, 42);
        assert_eq!(config.quiz.item_count, 10);
        assert_eq!(config.grading.match_mode, None);
        assert!(config.export.bom);
    }

    #[test]
    fn sample_config_parses_to_defaults() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, TrigradeConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = parse_config(
            r#"
[quiz]
seed = 7
item_count = 5
topics = ["congruence", "similarity_basic"]

[grading]
match_mode = "numeric"
"#,
        )
        .unwrap();
        assert_eq!(config.quiz.seed, 7);
        assert_eq!(config.quiz.topics, vec![Topic::Congruence, Topic::SimilarityBasic]);
        assert!(!config.quiz.varied_formats);
        assert_eq!(config.grading.match_mode, Some(MatchMode::Numeric));
        assert_eq!(config.session_path, PathBuf::from("trigrade-session.json"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = TrigradeConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "TRIGRADE_SEED" => Some("99".into()),
            "TRIGRADE_SESSION" => Some("/tmp/other.json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.quiz.seed, 99);
        assert_eq!(config.session_path, PathBuf::from("/tmp/other.json"));

        let bad = apply_env_overrides(&mut config, |key| {
            (key == "TRIGRADE_SEED").then(|| "forty-two".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_path_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trigrade.toml");
        std::fs::write(&path, "output_dir = \"out\"\n[export]\nbom = false\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.export.bom);
    }
}
