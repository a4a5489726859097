//! Configuration file loading for the command-line front end.
//!
//! Settings live in `chess.toml` in the working directory. Every field is
//! optional, and a missing file means defaults.

use chess_core::{FenParser, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Requested position name is not defined.
    #[error("Unknown position: {0}")]
    UnknownPosition(String),
    /// `promotion` names a piece a pawn cannot become.
    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(char),
}

/// Front-end settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CliConfig {
    /// Perft depth when `--depth` is not given. Defaults to 4.
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    /// Piece chosen for promotions entered without a suffix, as a FEN letter.
    /// Defaults to 'q'.
    #[serde(default = "default_promotion")]
    pub promotion: char,
    /// Named FEN positions, usable with `--position NAME`.
    #[serde(default)]
    pub positions: HashMap<String, String>,
}

fn default_depth() -> u32 {
    4
}

fn default_promotion() -> char {
    'q'
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            default_depth: default_depth(),
            promotion: default_promotion(),
            positions: HashMap::new(),
        }
    }
}

impl CliConfig {
    /// Loads `chess.toml` from the working directory, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }

    /// Resolves a position name. "startpos" is always defined, and
    /// entries in the file take precedence over it.
    pub fn position(&self, name: &str) -> Result<&str, ConfigError> {
        match self.positions.get(name) {
            Some(fen) => Ok(fen),
            None if name == "startpos" => Ok(FenParser::STARTPOS),
            None => Err(ConfigError::UnknownPosition(name.to_string())),
        }
    }

    /// The configured promotion piece.
    pub fn promotion_piece(&self) -> Result<PieceKind, ConfigError> {
        match PieceKind::from_fen_char(self.promotion) {
            Some((kind, _)) if kind.is_promotion_target() => Ok(kind),
            _ => Err(ConfigError::InvalidPromotion(self.promotion)),
        }
    }
}
