use std::{env, str::FromStr};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Reads and parses the environment variable `key`.
///
/// Returns `None` if the variable is unset, and `Some(Err(raw_value))` if it is set but cannot be parsed, so that the
/// caller can decide how loudly to complain before falling back to a default.
pub fn parse_env_var<T: FromStr>(key: &str) -> Option<Result<T, String>> {
    let raw = env::var(key).ok()?;
    Some(raw.trim().parse::<T>().map_err(|_| raw))
}
