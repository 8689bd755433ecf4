//! Configuration module.
//!
//! Parameter defaults come from a TOML file, an environment override and the command line, in
//! that order of increasing precedence.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides, ConfigError, ConfigFile, ResolvedConfig,
};
