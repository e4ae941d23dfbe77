//! Config file discovery and layered loading.
//!
//! [`load`] runs these steps in order:
//! 1. Parse `defaults.toml` as the base
//! 2. Merge `~/.logos/config.toml` (user)
//! 3. Merge `{workspace}/.logos/config.toml` (workspace)
//! 4. Merge the explicit `--config` file, if any
//! 5. Apply `LOGOS_*` fallbacks to fields no file set
//! 6. Deserialize and validate

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Name of the per-user and per-workspace config directory.
const CONFIG_DIR: &str = ".logos";

/// A loaded configuration along with where each field came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Layer that last set each dotted field path.
    #[serde(skip)]
    pub field_sources: FieldSources,
    /// Files that contributed, lowest priority first.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Layer that set the given dotted field path, if tracked.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }

    /// Render the final configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RenderError`] if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

/// Candidate config file locations in load order (lowest priority first).
///
/// The list contains paths whether or not they exist.
#[must_use]
pub fn candidate_paths(
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
    explicit: Option<&Path>,
) -> Vec<(ConfigLayer, PathBuf)> {
    let mut paths = Vec::new();
    if let Some(user) = user_config_path(home_override) {
        paths.push((ConfigLayer::User, user));
    }
    if let Some(ws) = workspace_root {
        paths.push((
            ConfigLayer::Workspace,
            ws.join(CONFIG_DIR).join("config.toml"),
        ));
    }
    if let Some(path) = explicit {
        paths.push((ConfigLayer::Explicit, path.to_path_buf()));
    }
    paths
}

/// Load the configuration with layered file precedence.
///
/// `home_override` is treated as the `.logos` directory itself. The explicit
/// file, unlike the user and workspace files, must exist.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed or oversized,
/// the explicit file is missing, or the merged configuration fails
/// validation.
pub fn load(
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
    explicit: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let env_vars = collect_env_vars();

    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    for (layer, path) in candidate_paths(workspace_root, home_override, explicit) {
        let overlay = if layer == ConfigLayer::Explicit {
            Some(read_toml(&path)?)
        } else {
            try_load_file(&path)?
        };
        let Some(overlay) = overlay else {
            continue;
        };
        deep_merge_tracking(&mut merged, &overlay, "", &layer, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), layer = %layer, "loaded config file");
    }

    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, &env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering, no env fallback).
///
/// Fields the file omits take their default values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = read_toml(path)?;
    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if it doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    match read_toml(path) {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

fn read_toml(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

fn user_config_path(home_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = home_override {
        return Some(dir.join("config.toml"));
    }
    directories::BaseDirs::new().map(|d| d.home_dir().join(CONFIG_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn workspace_overrides_user() {
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[bridge]\ntimeout_secs = 10\ninterpreter = \"python3.11\"\n",
        )
        .unwrap();
        std::fs::create_dir_all(ws.path().join(".logos")).unwrap();
        std::fs::write(
            ws.path().join(".logos").join("config.toml"),
            "[bridge]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let resolved = load(Some(ws.path()), Some(home.path()), None).unwrap();

        assert_eq!(resolved.config.bridge.timeout_secs, 5);
        assert_eq!(resolved.config.bridge.interpreter, "python3.11");
        assert_eq!(
            resolved.source_of("bridge.timeout_secs"),
            Some(&ConfigLayer::Workspace)
        );
        assert_eq!(resolved.loaded_files.len(), 2);
    }

    #[test]
    fn explicit_file_wins_and_must_exist() {
        let home = tempfile::tempdir().unwrap();
        let explicit = home.path().join("custom.toml");
        std::fs::write(&explicit, "[registry]\nmax_depth = 7\n").unwrap();

        let resolved = load(None, Some(home.path()), Some(&explicit)).unwrap();
        assert_eq!(resolved.config.registry.max_depth, 7);
        assert_eq!(
            resolved.source_of("registry.max_depth"),
            Some(&ConfigLayer::Explicit)
        );

        let missing = home.path().join("missing.toml");
        let err = load(None, Some(home.path()), Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("config.toml"), "[registry]\nmax_depth = 0\n").unwrap();

        let err = load(None, Some(home.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "registry.max_depth"));
    }

    #[test]
    fn load_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.bridge.timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[registry\nroots = ").unwrap();

        let err = load(None, Some(dir.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        assert!(
            try_load_file(Path::new("/nonexistent/logos/config.toml"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn rendered_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load(None, Some(dir.path()), None).unwrap();
        let rendered = resolved.to_toml().unwrap();
        let back: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(back.registry.anchors, resolved.config.registry.anchors);
    }
}
