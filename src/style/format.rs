//! Numeric formatting for CSS values.

/// Format a number with at most three decimals, trimming trailing zeros.
///
/// Non-finite input renders as `0` so a bad value can never produce invalid CSS.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = format!("{value:.3}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Format seconds as a CSS time value (`12s`, `0.333s`).
pub fn format_seconds(seconds: f64) -> String {
    format!("{}s", format_number(seconds))
}
