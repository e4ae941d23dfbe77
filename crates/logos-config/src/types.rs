use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unified configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discovery and indexing settings.
    pub registry: RegistrySection,
    /// External interpreter bridge settings.
    pub bridge: BridgeSection,
    /// Logging settings.
    pub logging: LoggingSection,
}

/// `[registry]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Ordered discovery root directories. Missing roots are skipped.
    pub roots: Vec<PathBuf>,
    /// Directory names below which the first segment names the category.
    pub anchors: Vec<String>,
    /// Maximum recursion depth below each root.
    pub max_depth: usize,
    /// Parent directory names never used as a category.
    pub generic_dirs: Vec<String>,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("agents")],
            anchors: vec!["specialized".to_owned()],
            max_depth: 3,
            generic_dirs: ["src", "lib", "services", "agents", "specialized", "backend", "app"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// `[bridge]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    /// Interpreter executable name or absolute path.
    pub interpreter: String,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
    /// Suffix the exported component type name must carry.
    pub class_suffix: String,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_owned(),
            timeout_secs: 30,
            class_suffix: "Agent".to_owned(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`, `full`).
    pub format: String,
    /// Extra `target=level` directives.
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
