//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::{StatsParams, SynergyParser, SynergyScope};
use crate::models::{GameModeFilter, DEFAULT_FIELD_SIZE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Analysis defaults, overridable per command or request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Game mode filter: "all", "solo" or "double-up"
    #[serde(default)]
    pub game_mode: GameModeFilter,

    /// Most recent matches to include (all when unset or 0)
    #[serde(default = "default_max_matches")]
    pub max_matches: Option<usize>,

    #[serde(default = "default_min_equipment_games")]
    pub min_equipment_games: u32,

    #[serde(default = "default_min_synergy_games")]
    pub min_synergy_games: u32,

    /// Players per lobby
    #[serde(default = "default_field_size")]
    pub field_size: u32,

    #[serde(default)]
    pub synergy_scope: SynergyScope,

    /// Extra synergy namespace markers on top of the built-in `TFT<n>` / `Set<n>` rules
    #[serde(default)]
    pub namespace_markers: Vec<String>,
}

fn default_max_matches() -> Option<usize> {
    Some(50)
}

fn default_min_equipment_games() -> u32 {
    3
}

fn default_min_synergy_games() -> u32 {
    2
}

fn default_field_size() -> u32 {
    DEFAULT_FIELD_SIZE
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            game_mode: GameModeFilter::All,
            max_matches: default_max_matches(),
            min_equipment_games: default_min_equipment_games(),
            min_synergy_games: default_min_synergy_games(),
            field_size: default_field_size(),
            synergy_scope: SynergyScope::All,
            namespace_markers: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Engine parameters for these defaults.
    pub fn to_params(&self) -> StatsParams {
        StatsParams {
            mode: self.game_mode,
            max_matches: self.max_matches.filter(|&n| n > 0),
            min_equipment_games: self.min_equipment_games,
            min_synergy_games: Some(self.min_synergy_games),
            field_size: self.field_size,
            synergy_scope: self.synergy_scope,
            synergy_parser: SynergyParser::default()
                .extend_markers(self.namespace_markers.iter().cloned()),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Match history file (JSON document or JSONL)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("tft_dashboard_data.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            analysis: AnalysisConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Data file path must not be empty".to_string(),
            ));
        }

        if self.analysis.field_size < 2 {
            return Err(ConfigError::ValidationError(
                "Field size must be at least 2".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
