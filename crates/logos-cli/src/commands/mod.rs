//! Command implementations.

pub(crate) mod components;
pub(crate) mod config;
pub(crate) mod exec;
pub(crate) mod scan;
pub(crate) mod stats;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logos_config::Config;
use logos_registry::Registry;
use tracing::debug;

use crate::config_bridge::{to_bridge_config, to_registry_config};

/// Build a registry from config and run discovery.
///
/// `root_overrides`, when non-empty, replace the configured roots.
pub(crate) async fn open_registry(
    cfg: &Config,
    workspace: Option<&Path>,
    root_overrides: &[PathBuf],
) -> anyhow::Result<Arc<Registry>> {
    let mut registry_config = to_registry_config(cfg, workspace);
    if !root_overrides.is_empty() {
        registry_config.roots = root_overrides.to_vec();
    }
    debug!(roots = ?registry_config.roots, "Opening registry");

    let registry = Registry::new(registry_config, to_bridge_config(cfg));
    registry.initialize().await?;
    Ok(Arc::new(registry))
}
