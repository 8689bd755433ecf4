//! Configuration file loading with precedence handling.

use crate::model::{Direction, GradientWidth, MarqueeParams};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MARQUEE_CONFIG";

/// Environment variable overriding the scroll direction.
pub const DIRECTION_ENV_VAR: &str = "MARQUEE_DIRECTION";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, the parameter defaults are used.
/// Corresponds to `~/.config/marquee/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Extra container class names.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Caller inline style.
    #[serde(default)]
    pub style: Option<String>,

    /// Duplicate content to cover the container.
    #[serde(default)]
    pub auto_fill: Option<bool>,

    /// Start playing.
    #[serde(default)]
    pub play: Option<bool>,

    /// Pause on hover.
    #[serde(default)]
    pub pause_on_hover: Option<bool>,

    /// Pause on click.
    #[serde(default)]
    pub pause_on_click: Option<bool>,

    /// Scroll direction (`left`, `right`, `up`, `down`).
    #[serde(default)]
    pub direction: Option<Direction>,

    /// Speed in pixels per second.
    #[serde(default)]
    pub speed: Option<f64>,

    /// Start delay in seconds.
    #[serde(default)]
    pub delay: Option<f64>,

    /// Loop count, 0 for infinite.
    #[serde(default)]
    pub loop_count: Option<u32>,

    /// Show gradient overlays.
    #[serde(default)]
    pub gradient: Option<bool>,

    /// Gradient color.
    #[serde(default)]
    pub gradient_color: Option<String>,

    /// Gradient width: a number of pixels or a CSS length string.
    #[serde(default)]
    pub gradient_width: Option<GradientWidth>,

    /// Enable drag-to-scrub.
    #[serde(default)]
    pub draggable: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Marquee parameters.
    pub params: MarqueeParams,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            params: MarqueeParams::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Flags given on the command line. `None` leaves the configured value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--speed`
    pub speed: Option<f64>,
    /// `--direction`
    pub direction: Option<Direction>,
    /// `--auto-fill`
    pub auto_fill: Option<bool>,
    /// `--draggable`
    pub draggable: Option<bool>,
    /// `--loop`
    pub loop_count: Option<u32>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/marquee/marquee.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("marquee").join("marquee.log")
    } else {
        PathBuf::from("marquee.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/marquee/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marquee").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `MARQUEE_CONFIG` environment variable
/// 3. Default path `~/.config/marquee/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `MARQUEE_DIRECTION`: Override direction. Unrecognized values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(DIRECTION_ENV_VAR) {
        match value.parse::<Direction>() {
            Ok(direction) => config.params.direction = direction,
            Err(err) => warn!(variable = DIRECTION_ENV_VAR, error = %err, "ignoring override"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };
    let base = defaults.params;

    ResolvedConfig {
        params: MarqueeParams {
            class_name: config.class_name.unwrap_or(base.class_name),
            style: config.style.unwrap_or(base.style),
            auto_fill: config.auto_fill.unwrap_or(base.auto_fill),
            play: config.play.unwrap_or(base.play),
            pause_on_hover: config.pause_on_hover.unwrap_or(base.pause_on_hover),
            pause_on_click: config.pause_on_click.unwrap_or(base.pause_on_click),
            direction: config.direction.unwrap_or(base.direction),
            speed: config.speed.unwrap_or(base.speed),
            delay: config.delay.unwrap_or(base.delay),
            loop_count: config.loop_count.unwrap_or(base.loop_count),
            gradient: config.gradient.unwrap_or(base.gradient),
            gradient_color: config.gradient_color.unwrap_or(base.gradient_color),
            gradient_width: config.gradient_width.unwrap_or(base.gradient_width),
            draggable: config.draggable.unwrap_or(base.draggable),
        },
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    let params = &mut config.params;

    if let Some(speed) = overrides.speed {
        params.speed = speed;
    }
    if let Some(direction) = overrides.direction {
        params.direction = direction;
    }
    if let Some(auto_fill) = overrides.auto_fill {
        params.auto_fill = auto_fill;
    }
    if let Some(draggable) = overrides.draggable {
        params.draggable = draggable;
    }
    if let Some(loop_count) = overrides.loop_count {
        params.loop_count = loop_count;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
