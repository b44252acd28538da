use anyhow::{bail, Context, Result};
use confyg::{env, Confygery};
use kizuna_graph::SimilarityWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::LoadOptions;

/// Configuration for kizuna.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (KIZUNA_* prefix)
/// 3. Config file (~/.config/kizuna/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the CSV dataset.
    ///
    /// Can be set via:
    /// - CLI: --data /path/to/anime.csv
    /// - ENV: KIZUNA_DATASET_PATH
    /// - Config: dataset_path = "/path/to/anime.csv"
    /// - Default: anime.csv in the working directory
    pub dataset_path: PathBuf,

    /// Minimum similarity for two items to be linked, in [0, 1].
    pub similarity_threshold: f64,

    /// Rows with fewer members than this are not loaded.
    pub min_popularity: u64,

    /// Maximum number of search suggestions to show.
    pub suggestion_limit: usize,

    /// How much each attribute contributes to similarity.
    pub weights: SimilarityWeights,

    /// Logger settings handed to twyg by the binary.
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            similarity_threshold: 0.75,
            min_popularity: 0,
            suggestion_limit: 20,
            weights: SimilarityWeights::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from the file at `config_path` and from
    /// environment variables with the KIZUNA_ prefix.
    ///
    /// A missing file is not an error; the binary passes
    /// [`config_file_path`] unless `--config` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// merged settings fail [`Config::validate`].
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
            log::debug!("reading configuration from {path_str}");
        }

        let env_opts = env::Options::with_top_level("kizuna");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            bail!(
                "similarity_threshold must be between 0 and 1, got {}",
                self.similarity_threshold
            );
        }
        self.weights
            .validate()
            .context("Invalid similarity weights")?;
        if self.suggestion_limit == 0 {
            bail!("suggestion_limit must be at least 1");
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().with_min_popularity(self.min_popularity)
    }

    /// The effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("anime.csv")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/kizuna/config.toml
/// - macOS: ~/Library/Application Support/kizuna/config.toml
/// - Windows: %APPDATA%\kizuna\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kizuna")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Kizuna Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (KIZUNA_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the CSV dataset
#
# Can also be set via:
# - CLI: kizuna --data /path/to/anime.csv stats
# - Environment: KIZUNA_DATASET_PATH=/path/to/anime.csv
dataset_path = "anime.csv"

# Minimum similarity (0 to 1) for two titles to be linked in the graph
similarity_threshold = 0.75

# Skip titles with fewer members than this when loading. 0 keeps every
# title; 200000 narrows the catalog to widely watched titles.
min_popularity = 0

# Maximum number of search suggestions
suggestion_limit = 20

# Contribution of each attribute to similarity; must sum to 1
[weights]
categories = 0.40
kind = 0.20
episodes = 0.15
rating = 0.15
popularity = 0.10

# Logger settings (level, colour, output) live in an optional [logging] table
"#
}

/// Create the config file at `config_path` with the example content if it
/// doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;
    log::info!("wrote default configuration to {}", config_path.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset_path, PathBuf::from("anime.csv"));
        assert!((config.similarity_threshold - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.suggestion_limit, 20);
        assert!(config.validate().is_ok());
    }

    fn assert_same_settings(a: &Config, b: &Config) {
        assert_eq!(a.dataset_path, b.dataset_path);
        assert!((a.similarity_threshold - b.similarity_threshold).abs() < f64::EPSILON);
        assert_eq!(a.min_popularity, b.min_popularity);
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.suggestion_limit, b.suggestion_limit);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let parsed: Config = toml::from_str(example_config()).unwrap();
        assert_same_settings(&parsed, &Config::default());
        assert!(example_config().contains("200000"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("similarity_threshold = 0.5\n").unwrap();
        assert!((parsed.similarity_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(parsed.weights, SimilarityWeights::default());
        assert_eq!(parsed.suggestion_limit, 20);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = Config {
            similarity_threshold: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            suggestion_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_ensure_config_file_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(ensure_config_file_at(&path).unwrap());
        assert!(!ensure_config_file_at(&path).unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, example_config());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_same_settings(&parsed, &config);
    }
}
