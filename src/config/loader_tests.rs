//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_returns_some_path() {
    let path = default_config_path();
    assert!(
        path.is_some(),
        "default_config_path should return Some on supported platforms"
    );
}

#[test]
fn default_config_path_contains_marquee_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("marquee") && path_str.ends_with("config.toml"),
        "Path should contain 'marquee' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("marquee_test_config.toml");

    let toml_content = r#"
direction = "up"
speed = 80.0
auto_fill = true
loop_count = 3
gradient = true
gradient_width = "10%"
draggable = true
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.direction, Some(Direction::Up));
    assert_eq!(config.speed, Some(80.0));
    assert_eq!(config.auto_fill, Some(true));
    assert_eq!(config.loop_count, Some(3));
    assert_eq!(config.gradient, Some(true));
    assert_eq!(
        config.gradient_width,
        Some(GradientWidth::Css("10%".to_string()))
    );
    assert_eq!(config.draggable, Some(true));
    assert_eq!(config.play, None);

    fs::remove_file(config_path).ok();
}

#[test]
fn gradient_width_accepts_plain_number() {
    let config: ConfigFile = toml::from_str("gradient_width = 120").expect("valid TOML");
    assert_eq!(config.gradient_width, Some(GradientWidth::Pixels(120.0)));
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("marquee_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{")
        .expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn unknown_direction_is_a_parse_error() {
    let result: Result<ConfigFile, _> = toml::from_str(r#"direction = "sideways""#);
    assert!(result.is_err());
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(
        result.is_err(),
        "Unknown fields must be rejected, not silently ignored"
    );
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        speed: Some(120.0),
        direction: Some(Direction::Right),
        pause_on_hover: Some(true),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    let defaults = MarqueeParams::default();

    assert_eq!(resolved.params.speed, 120.0);
    assert_eq!(resolved.params.direction, Direction::Right);
    assert!(resolved.params.pause_on_hover);
    assert_eq!(resolved.params.play, defaults.play);
    assert_eq!(resolved.params.gradient_color, defaults.gradient_color);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(marquee_direction)]
fn apply_env_overrides_respects_marquee_direction() {
    let _guard = EnvGuard::new(DIRECTION_ENV_VAR);
    env::set_var(DIRECTION_ENV_VAR, "down");

    let result = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(result.params.direction, Direction::Down);
}

#[test]
#[serial(marquee_direction)]
fn apply_env_overrides_ignores_invalid_direction() {
    let _guard = EnvGuard::new(DIRECTION_ENV_VAR);
    env::set_var(DIRECTION_ENV_VAR, "diagonal");

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(marquee_direction)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(DIRECTION_ENV_VAR);

    let base = ResolvedConfig::default();
    assert_eq!(
        apply_env_overrides(base.clone()),
        base,
        "Config should be unchanged when MARQUEE_DIRECTION not set"
    );
}

#[test]
#[serial(marquee_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let temp_dir = env::temp_dir();
    let explicit = temp_dir.join("marquee_test_explicit.toml");
    let from_env = temp_dir.join("marquee_test_env.toml");
    fs::write(&explicit, "speed = 10.0").expect("write explicit config");
    fs::write(&from_env, "speed = 20.0").expect("write env config");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .expect("should load")
        .expect("should find file");
    assert_eq!(config.speed, Some(10.0));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(marquee_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let from_env = env::temp_dir().join("marquee_test_env_only.toml");
    fs::write(&from_env, "draggable = true").expect("write env config");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = load_config_with_precedence(None)
        .expect("should load")
        .expect("should find file");
    assert_eq!(config.draggable, Some(true));

    fs::remove_file(from_env).ok();
}

#[test]
#[serial(marquee_config)]
fn load_config_with_precedence_missing_env_file_is_not_an_error() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/marquee/config.toml");

    assert_eq!(load_config_with_precedence(None), Ok(None));
}

#[test]
fn apply_cli_overrides_replaces_only_given_fields() {
    let base = merge_config(Some(ConfigFile {
        speed: Some(30.0),
        pause_on_click: Some(true),
        ..ConfigFile::default()
    }));

    let result = apply_cli_overrides(
        base.clone(),
        CliOverrides {
            direction: Some(Direction::Up),
            loop_count: Some(2),
            ..CliOverrides::default()
        },
    );

    assert_eq!(result.params.direction, Direction::Up);
    assert_eq!(result.params.loop_count, 2);
    assert_eq!(result.params.speed, 30.0);
    assert!(result.params.pause_on_click);
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), CliOverrides::default()), base);
}

#[test]
#[serial(marquee_direction)]
fn precedence_chain_full_defaults_to_cli() {
    let _guard = EnvGuard::new(DIRECTION_ENV_VAR);
    let file = ConfigFile {
        direction: Some(Direction::Right),
        speed: Some(70.0),
        ..ConfigFile::default()
    };
    env::set_var(DIRECTION_ENV_VAR, "up");

    let resolved = apply_cli_overrides(
        apply_env_overrides(merge_config(Some(file))),
        CliOverrides {
            speed: Some(90.0),
            ..CliOverrides::default()
        },
    );

    assert_eq!(resolved.params.direction, Direction::Up, "env beats file");
    assert_eq!(resolved.params.speed, 90.0, "cli beats file");
}
