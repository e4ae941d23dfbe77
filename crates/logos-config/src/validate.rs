//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound for `registry.max_depth`.
const MAX_DISCOVERY_DEPTH: usize = 16;

/// Upper bound for `bridge.timeout_secs` (one hour).
const MAX_BRIDGE_TIMEOUT_SECS: u64 = 3600;

/// Validate a fully merged configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_registry(config)?;
    validate_bridge(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_registry(config: &Config) -> ConfigResult<()> {
    let r = &config.registry;

    if r.roots.is_empty() {
        return Err(invalid("registry.roots", "at least one discovery root is required"));
    }

    if r.max_depth == 0 || r.max_depth > MAX_DISCOVERY_DEPTH {
        return Err(invalid(
            "registry.max_depth",
            format!(
                "max_depth {} is out of range; must be between 1 and {MAX_DISCOVERY_DEPTH}",
                r.max_depth
            ),
        ));
    }

    if r.anchors.iter().any(|a| a.trim().is_empty()) {
        return Err(invalid("registry.anchors", "anchor names must not be empty"));
    }

    Ok(())
}

fn validate_bridge(config: &Config) -> ConfigResult<()> {
    let b = &config.bridge;

    if b.interpreter.trim().is_empty() {
        return Err(invalid("bridge.interpreter", "interpreter must not be empty"));
    }

    if b.timeout_secs == 0 || b.timeout_secs > MAX_BRIDGE_TIMEOUT_SECS {
        return Err(invalid(
            "bridge.timeout_secs",
            format!(
                "timeout_secs {} is out of range; must be between 1 and {MAX_BRIDGE_TIMEOUT_SECS}",
                b.timeout_secs
            ),
        ));
    }

    if b.class_suffix.trim().is_empty() {
        return Err(invalid("bridge.class_suffix", "class_suffix must not be empty"));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !matches!(l.format.as_str(), "pretty" | "compact" | "json" | "full") {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: pretty, compact, json, full",
                l.format
            ),
        ));
    }

    if !matches!(
        l.level.to_ascii_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace"
    ) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: error, warn, info, debug, trace",
                l.level
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn depth_bounds() {
        let mut config = Config::default();
        config.registry.max_depth = 17;
        assert_eq!(field_of(validate(&config).unwrap_err()), "registry.max_depth");
        config.registry.max_depth = 16;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_roots_rejected() {
        let mut config = Config::default();
        config.registry.roots.clear();
        assert_eq!(field_of(validate(&config).unwrap_err()), "registry.roots");
    }

    #[test]
    fn timeout_bounds() {
        let mut config = Config::default();
        config.bridge.timeout_secs = 0;
        assert_eq!(field_of(validate(&config).unwrap_err()), "bridge.timeout_secs");
        config.bridge.timeout_secs = 3601;
        assert_eq!(field_of(validate(&config).unwrap_err()), "bridge.timeout_secs");
    }

    #[test]
    fn blank_interpreter_rejected() {
        let mut config = Config::default();
        config.bridge.interpreter = "  ".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "bridge.interpreter");
    }

    #[test]
    fn unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.format");
    }
}
