use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DatasetError, Result};

/// Half-moves played through before any row is emitted.
pub const DEFAULT_OPENING_PLIES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

/// Settings for one extraction run. Every field has a default, so a JSON
/// config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Opening half-moves skipped per game.
    pub opening_plies: usize,
    /// Player the dataset is built for; defaults to the PGN file stem.
    pub player_name: Option<String>,
    /// Only emit positions where the player is on move.
    pub player_moves_only: bool,
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
    pub format: OutputFormat,
    /// Add the `move_is_capture` and `move_gives_check` columns.
    pub candidate_descriptors: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            opening_plies: DEFAULT_OPENING_PLIES,
            player_name: None,
            player_moves_only: false,
            threads: None,
            format: OutputFormat::Csv,
            candidate_descriptors: false,
        }
    }
}

impl ExtractConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(DatasetError::Config("threads must be at least 1".to_string()));
        }
        if matches!(&self.player_name, Some(name) if name.trim().is_empty()) {
            return Err(DatasetError::Config("player_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Player name from the config, falling back to the file stem of `pgn_path`.
    pub fn resolve_player_name(&self, pgn_path: &Path) -> String {
        if let Some(name) = &self.player_name {
            return name.clone();
        }
        let mut stem = pgn_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        // games.pgn.gz -> games
        if let Some(inner) = stem.strip_suffix(".pgn") {
            stem = inner.to_string();
        }
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.opening_plies, 10);
        assert_eq!(config.format, OutputFormat::Csv);
        assert!(!config.candidate_descriptors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{ "opening_plies": 4, "format": "jsonl" }"#).unwrap();
        assert_eq!(config.opening_plies, 4);
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert!(!config.player_moves_only);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = ExtractConfig {
            threads: Some(0),
            ..ExtractConfig::default()
        };
        assert!(matches!(config.validate(), Err(DatasetError::Config(_))));
    }

    #[test]
    fn test_player_name_from_file_stem() {
        let config = ExtractConfig::default();
        assert_eq!(
            config.resolve_player_name(&PathBuf::from("data/Carlsen.pgn")),
            "Carlsen"
        );
        assert_eq!(
            config.resolve_player_name(&PathBuf::from("data/Carlsen.pgn.gz")),
            "Carlsen"
        );

        let named = ExtractConfig {
            player_name: Some("Tal".to_string()),
            ..ExtractConfig::default()
        };
        assert_eq!(named.resolve_player_name(&PathBuf::from("x.pgn")), "Tal");
    }
}
