//! Bridge from `logos_config::Config` to registry and telemetry types.
//!
//! `logos-registry` does not depend on the config crate. Conversion
//! happens here, once, for every command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use logos_config::Config;
use logos_registry::{BridgeConfig, RegistryConfig};
use logos_telemetry::{LogConfig, LogFormat};

/// Convert config to [`RegistryConfig`].
///
/// Relative roots are resolved against `base` so that a workspace config
/// behaves the same from any subdirectory.
#[must_use]
pub(crate) fn to_registry_config(cfg: &Config, base: Option<&Path>) -> RegistryConfig {
    let roots = cfg
        .registry
        .roots
        .iter()
        .map(|root| resolve(root, base))
        .collect();

    RegistryConfig {
        roots,
        anchors: cfg.registry.anchors.clone(),
        max_depth: cfg.registry.max_depth,
        generic_dirs: cfg.registry.generic_dirs.clone(),
    }
}

fn resolve(root: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) if root.is_relative() => base.join(root),
        _ => root.to_path_buf(),
    }
}

/// Convert config to [`BridgeConfig`].
#[must_use]
pub(crate) fn to_bridge_config(cfg: &Config) -> BridgeConfig {
    BridgeConfig {
        interpreter: cfg.bridge.interpreter.clone(),
        timeout: Duration::from_secs(cfg.bridge.timeout_secs),
        class_suffix: cfg.bridge.class_suffix.clone(),
    }
}

/// Convert config to [`LogConfig`].
#[must_use]
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = match cfg.logging.format.as_str() {
        "pretty" => LogFormat::Pretty,
        "json" => LogFormat::Json,
        "full" => LogFormat::Full,
        _ => LogFormat::Compact,
    };

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_roots_resolve_against_base() {
        let mut cfg = Config::default();
        cfg.registry.roots = vec![PathBuf::from("agents"), PathBuf::from("/opt/agents")];

        let rc = to_registry_config(&cfg, Some(Path::new("/work")));
        assert_eq!(
            rc.roots,
            [PathBuf::from("/work/agents"), PathBuf::from("/opt/agents")]
        );
        assert_eq!(rc.max_depth, 3);

        let rc = to_registry_config(&cfg, None);
        assert_eq!(rc.roots[0], PathBuf::from("agents"));
    }

    #[test]
    fn bridge_timeout_is_seconds() {
        let mut cfg = Config::default();
        cfg.bridge.timeout_secs = 7;
        cfg.bridge.interpreter = "python3.12".into();

        let bc = to_bridge_config(&cfg);
        assert_eq!(bc.timeout, Duration::from_secs(7));
        assert_eq!(bc.interpreter, "python3.12");
        assert_eq!(bc.class_suffix, "Agent");
    }

    #[test]
    fn log_format_mapping() {
        let mut cfg = Config::default();
        cfg.logging.format = "json".into();
        cfg.logging.directives = vec!["logos_registry::bridge=trace".into()];

        let lc = to_log_config(&cfg);
        assert_eq!(lc.format, LogFormat::Json);
        assert_eq!(lc.directives.len(), 1);

        cfg.logging.format = "anything".into();
        assert_eq!(to_log_config(&cfg).format, LogFormat::Compact);
    }
}
