//! `LOGOS_*` environment fallbacks.
//!
//! An environment variable only fills a field that no config file set.
//! Fields still attributed to [`ConfigLayer::Defaults`] are eligible.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::merge::{ConfigLayer, FieldSources};

/// Environment variable name to dotted config path.
const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("LOGOS_REGISTRY_ROOTS", "registry.roots"),
    ("LOGOS_MAX_DEPTH", "registry.max_depth"),
    ("LOGOS_BRIDGE_INTERPRETER", "bridge.interpreter"),
    ("LOGOS_BRIDGE_TIMEOUT_SECS", "bridge.timeout_secs"),
    ("LOGOS_LOG_LEVEL", "logging.level"),
    ("LOGOS_LOG_FORMAT", "logging.format"),
];

/// Snapshot the `LOGOS_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("LOGOS_"))
        .collect()
}

/// Names of every recognised environment variable, with the field each one
/// feeds.
#[must_use]
pub fn known_env_vars() -> &'static [(&'static str, &'static str)] {
    ENV_MAPPINGS
}

/// Apply environment fallbacks to fields that still hold their default.
///
/// Returns the number of fields that were set from the environment.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;
    for (var, field) in ENV_MAPPINGS {
        let Some(raw) = env_vars.get(*var) else {
            continue;
        };
        let eligible = matches!(sources.get(*field), None | Some(ConfigLayer::Defaults));
        if !eligible {
            debug!(var, field, "config file already sets field; ignoring env var");
            continue;
        }
        let Some(value) = coerce_env_value(field, raw) else {
            warn!(var, value = %raw, "could not interpret environment variable; ignoring");
            continue;
        };
        if set_field(merged, field, value) {
            sources.insert((*field).to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        }
    }
    applied
}

/// Convert a raw environment string into the TOML type the field expects.
fn coerce_env_value(field: &str, raw: &str) -> Option<toml::Value> {
    match field {
        "registry.roots" => {
            let roots: Vec<toml::Value> = std::env::split_paths(raw)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| toml::Value::String(p.display().to_string()))
                .collect();
            Some(toml::Value::Array(roots))
        },
        "registry.max_depth" | "bridge.timeout_secs" => {
            raw.trim().parse::<i64>().ok().map(toml::Value::Integer)
        },
        _ => Some(toml::Value::String(raw.to_owned())),
    }
}

/// Write `value` at a dotted path, creating intermediate tables.
fn set_field(root: &mut toml::Value, dotted: &str, value: toml::Value) -> bool {
    let mut parts: Vec<&str> = dotted.split('.').collect();
    let Some(leaf) = parts.pop() else {
        return false;
    };
    let mut cursor = root;
    for part in parts {
        let Some(table) = cursor.as_table_mut() else {
            return false;
        };
        cursor = table
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    match cursor.as_table_mut() {
        Some(table) => {
            table.insert(leaf.to_owned(), value);
            true
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::record_leaves;

    fn defaults() -> (toml::Value, FieldSources) {
        let val: toml::Value = toml::from_str(
            "[registry]\nroots = [\"agents\"]\nmax_depth = 3\n[bridge]\ninterpreter = \"python3\"\ntimeout_secs = 30\n",
        )
        .unwrap();
        let mut sources = FieldSources::new();
        record_leaves(&val, "", &ConfigLayer::Defaults, &mut sources);
        (val, sources)
    }

    #[test]
    fn env_fills_default_fields() {
        let (mut merged, mut sources) = defaults();
        let env = HashMap::from([
            ("LOGOS_BRIDGE_TIMEOUT_SECS".to_owned(), "12".to_owned()),
            ("LOGOS_BRIDGE_INTERPRETER".to_owned(), "/usr/bin/python3.12".to_owned()),
        ]);

        let n = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(n, 2);
        assert_eq!(merged["bridge"]["timeout_secs"].as_integer(), Some(12));
        assert_eq!(
            sources.get("bridge.interpreter"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn env_never_overrides_file_values() {
        let (mut merged, mut sources) = defaults();
        sources.insert("registry.max_depth".to_owned(), ConfigLayer::User);
        let env = HashMap::from([("LOGOS_MAX_DEPTH".to_owned(), "9".to_owned())]);

        let n = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(n, 0);
        assert_eq!(merged["registry"]["max_depth"].as_integer(), Some(3));
    }

    #[test]
    fn roots_split_on_path_separator() {
        let (mut merged, mut sources) = defaults();
        let joined = std::env::join_paths(["one", "two"]).unwrap();
        let env = HashMap::from([(
            "LOGOS_REGISTRY_ROOTS".to_owned(),
            joined.to_string_lossy().into_owned(),
        )]);

        apply_env_fallbacks(&mut merged, &mut sources, &env);

        let roots = merged["registry"]["roots"].as_array().unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1].as_str(), Some("two"));
    }

    #[test]
    fn unparseable_numbers_are_ignored() {
        let (mut merged, mut sources) = defaults();
        let env = HashMap::from([("LOGOS_MAX_DEPTH".to_owned(), "deep".to_owned())]);

        assert_eq!(apply_env_fallbacks(&mut merged, &mut sources, &env), 0);
        assert_eq!(sources.get("registry.max_depth"), Some(&ConfigLayer::Defaults));
    }
}
