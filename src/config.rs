//! Configuration management for the typing log analyzer
//!
//! Settings are read from a TOML file in the platform config directory. A
//! missing file means defaults; command-line flags override individual values.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/typing-log-analyzer/config.toml` |
//! | macOS | `~/Library/Application Support/typing-log-analyzer/config.toml` |
//! | Windows | `%APPDATA%\typing-log-analyzer\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use typing_log_analyzer::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.analysis.min_pair_samples = 10;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Returns the path to the default config file. The file may not exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("typing-log-analyzer").join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Analyzer thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Chart output and styling
    #[serde(default)]
    pub plots: PlotConfig,
    /// Where `--all` looks for logs
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Length of every ranked list
    pub top_n: usize,
    /// Key pairs seen fewer times than this are left out of the ranking
    /// (values below 5 act as 5)
    pub min_pair_samples: usize,
    /// Mistake rates at or above this percentage are flagged
    pub mistake_rate_warning_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_pair_samples: 5,
            mistake_rate_warning_pct: 10.0,
        }
    }
}

/// Plot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Directory the images are written to (created if absent)
    pub output_dir: PathBuf,
    /// Number of bins in the elapsed-time histogram
    pub histogram_bins: usize,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Explicit font file for chart text
    pub font_path: Option<PathBuf>,
    /// Font files tried in order when `font_path` is unset
    pub font_candidates: Vec<PathBuf>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./plots"),
            histogram_bins: 50,
            width: 1500,
            height: 900,
            font_path: None,
            font_candidates: default_font_candidates(),
        }
    }
}

/// Fonts with Hangul coverage first so key and process names render.
fn default_font_candidates() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            "C:\\Windows\\Fonts\\malgun.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]
    };
    paths.iter().map(PathBuf::from).collect()
}

/// Log discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LogsConfig {
    /// Overrides the capturing tool's default log directory
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}
