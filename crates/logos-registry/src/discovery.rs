//! Filesystem discovery of agent source files.
//!
//! Walks each configured root up to the depth bound, infers a category for
//! every agent-looking file, and hands it to the loader. Unreadable
//! directories and files are logged and recorded, never fatal.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::bridge::ExternalBridge;
use crate::category::normalize_category;
use crate::component::ComponentDescriptor;
use crate::error::DiscoveryError;
use crate::loader::load_component;

/// Discovery settings.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Ordered roots. Missing roots are skipped.
    pub roots: Vec<PathBuf>,
    /// Directory names whose first child names the category.
    pub anchors: Vec<String>,
    /// Maximum directory depth below a root.
    pub max_depth: usize,
    /// Parent names that never become a category.
    pub generic_dirs: Vec<String>,
}

impl Default for RegistryConfig {
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

impl RegistryConfig {
    /// Config scanning only `roots`, other settings default.
    #[must_use]
    pub fn with_roots(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// A non-fatal discovery problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryWarning {
    /// Path involved.
    pub path: PathBuf,
    /// What went wrong.
    pub message: String,
}

impl From<&DiscoveryError> for DiscoveryWarning {
    fn from(err: &DiscoveryError) -> Self {
        let path = match err {
            DiscoveryError::DirectoryRead { path, .. }
            | DiscoveryError::FileRead { path, .. }
            | DiscoveryError::NotAnAgent { path } => path.clone(),
        };
        Self {
            path,
            message: err.to_string(),
        }
    }
}

/// Outcome of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    /// Files successfully loaded and registered.
    pub loaded: usize,
    /// Host-registered native components.
    pub native: usize,
    /// Files whose id was already taken.
    pub skipped_duplicates: usize,
    /// Files that could not be loaded.
    pub failed: usize,
    /// Loaded files per normalized category.
    pub by_category: BTreeMap<String, usize>,
    /// Everything that was skipped with a reason.
    pub warnings: Vec<DiscoveryWarning>,
}

impl DiscoveryReport {
    /// Total components registered, discovered plus native.
    #[must_use]
    pub fn total(&self) -> usize {
        self.loaded.saturating_add(self.native)
    }

    fn warn(&mut self, err: &DiscoveryError) {
        warn!(error = %err, "Discovery warning");
        self.warnings.push(DiscoveryWarning::from(err));
    }
}

/// A file that looks like an agent, with the raw category inferred for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Source file.
    pub path: PathBuf,
    /// Inferred category before normalization.
    pub category: String,
}

/// Whether a file name matches the agent naming pattern.
#[must_use]
pub fn is_agent_file(path: &Path) -> bool {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    let name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    stem.ends_with("_agent") || name.contains("agent")
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name.starts_with("__") || name == "node_modules"
}

/// Infer the raw category for a file.
///
/// The first directory below the nearest anchor wins; otherwise the parent
/// directory unless it is generic; otherwise `general`.
#[must_use]
pub fn infer_category(file: &Path, config: &RegistryConfig) -> String {
    let dirs: Vec<&str> = file
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let is_anchor = |d: &str| config.anchors.iter().any(|a| a.eq_ignore_ascii_case(d));
    if let Some(pos) = dirs.iter().rposition(|d| is_anchor(d)) {
        if let Some(below) = dirs.get(pos.saturating_add(1)) {
            return (*below).to_owned();
        }
    }

    match dirs.last() {
        Some(parent)
            if !config.generic_dirs.iter().any(|g| g.eq_ignore_ascii_case(parent))
                && !is_anchor(parent) =>
        {
            (*parent).to_owned()
        },
        _ => "general".to_owned(),
    }
}

/// Collect agent candidates under every root.
///
/// Entries within a directory are visited in name order so that
/// first-seen-wins duplicate handling is deterministic.
#[must_use]
pub fn collect_candidates(config: &RegistryConfig) -> (Vec<Candidate>, Vec<DiscoveryError>) {
    let mut candidates = Vec::new();
    let mut errors = Vec::new();
    for root in &config.roots {
        if !root.is_dir() {
            debug!(path = %root.display(), "Discovery root does not exist, skipping");
            continue;
        }
        info!(path = %root.display(), "Discovering components");

        // Files may sit one level below the deepest directory visited.
        let walker = WalkDir::new(root)
            .max_depth(config.max_depth.saturating_add(1))
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || e.file_name().to_str().is_none_or(|s| !is_skipped_dir(s))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| root.clone(), Path::to_path_buf);
                    errors.push(DiscoveryError::DirectoryRead {
                        path,
                        source: io::Error::from(e),
                    });
                    continue;
                },
            };
            if entry.file_type().is_file() && is_agent_file(entry.path()) {
                let path = entry.into_path();
                let category = infer_category(&path, config);
                candidates.push(Candidate { path, category });
            }
        }
    }
    (candidates, errors)
}

/// Run a full discovery pass, calling `register` for every loaded
/// descriptor. `register` returns `false` when the id is already taken.
pub async fn run_discovery<F>(
    config: &RegistryConfig,
    bridge: &ExternalBridge,
    mut register: F,
) -> DiscoveryReport
where
    F: FnMut(ComponentDescriptor) -> bool + Send,
{
    let mut report = DiscoveryReport::default();
    let (candidates, errors) = collect_candidates(config);
    for err in &errors {
        report.warn(err);
    }

    for candidate in candidates {
        match load_component(bridge, &candidate.path, &candidate.category).await {
            Ok(descriptor) => {
                let id = descriptor.id.clone();
                let category = descriptor.category.clone();
                if register(descriptor) {
                    report.loaded = report.loaded.saturating_add(1);
                    let count = report.by_category.entry(category).or_insert(0);
                    *count = count.saturating_add(1);
                } else {
                    debug!(
                        component_id = %id,
                        path = %candidate.path.display(),
                        "Duplicate component id, keeping first"
                    );
                    report.skipped_duplicates = report.skipped_duplicates.saturating_add(1);
                }
            },
            Err(e) => {
                report.failed = report.failed.saturating_add(1);
                report.warn(&e);
            },
        }
    }

    info!(
        loaded = report.loaded,
        duplicates = report.skipped_duplicates,
        failed = report.failed,
        "Discovery complete"
    );
    report
}

/// Normalized category a file would be registered under.
#[must_use]
pub fn category_for(file: &Path, config: &RegistryConfig) -> String {
    normalize_category(&infer_category(file, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_file_pattern() {
        assert!(is_agent_file(Path::new("cardiology_agent.py")));
        assert!(is_agent_file(Path::new("TaxAgent.ts")));
        assert!(is_agent_file(Path::new("agent_template.py")));
        assert!(!is_agent_file(Path::new("helpers.py")));
        assert!(!is_agent_file(Path::new("__init__.py")));
    }

    #[test]
    fn category_below_anchor() {
        let config = RegistryConfig::default();
        let p = Path::new("backend/src/services/agents/specialized/medical/cardio/heart_agent.py");
        assert_eq!(infer_category(p, &config), "medical");
    }

    #[test]
    fn category_from_parent_when_no_anchor() {
        let config = RegistryConfig::default();
        assert_eq!(infer_category(Path::new("agents/fin/tax_agent.py"), &config), "fin");
        assert_eq!(category_for(Path::new("agents/fin/tax_agent.py"), &config), "finance");
    }

    #[test]
    fn generic_parent_falls_back_to_general() {
        let config = RegistryConfig::default();
        assert_eq!(infer_category(Path::new("agents/echo_agent.py"), &config), "general");
        assert_eq!(infer_category(Path::new("specialized/x_agent.py"), &config), "general");
        assert_eq!(infer_category(Path::new("x_agent.py"), &config), "general");
    }

    #[test]
    fn walk_respects_depth_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let deep = root.join("a").join("b").join("c");
        std::fs::create_dir_all(deep.join("d")).unwrap();
        std::fs::create_dir_all(root.join(".hidden")).unwrap();
        std::fs::create_dir_all(root.join("__pycache__")).unwrap();
        std::fs::write(deep.join("ok_agent.py"), "").unwrap();
        std::fs::write(deep.join("d").join("too_deep_agent.py"), "").unwrap();
        std::fs::write(root.join(".hidden").join("h_agent.py"), "").unwrap();
        std::fs::write(root.join("__pycache__").join("c_agent.py"), "").unwrap();
        std::fs::write(root.join("notes.py"), "").unwrap();

        let config = RegistryConfig::with_roots([root]);
        let (candidates, errors) = collect_candidates(&config);

        assert!(errors.is_empty());
        let names: Vec<_> = candidates
            .iter()
            .map(|c| c.path.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["ok_agent.py"]);
        assert_eq!(candidates[0].category, "c");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_abort_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let locked = root.join("locked");
        let open = root.join("open");
        std::fs::create_dir_all(&locked).unwrap();
        std::fs::create_dir_all(&open).unwrap();
        std::fs::write(locked.join("hidden_agent.py"), "").unwrap();
        std::fs::write(open.join("visible_agent.py"), "").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user.
        if std::fs::read_dir(&locked).is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let config = RegistryConfig::with_roots([root]);
        let (candidates, errors) = collect_candidates(&config);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].path.ends_with("open/visible_agent.py"));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            DiscoveryError::DirectoryRead { path, .. } if path.ends_with("locked")
        ));
    }

    #[test]
    fn missing_roots_are_skipped() {
        let config = RegistryConfig::with_roots(["/definitely/not/here"]);
        let (candidates, errors) = collect_candidates(&config);
        assert!(candidates.is_empty());
        assert!(errors.is_empty());
    }
}
