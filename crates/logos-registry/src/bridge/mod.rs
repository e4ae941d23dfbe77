//! External runtime bridge.
//!
//! Runs bridged capabilities in a short-lived interpreter process, one
//! process per call. When the interpreter probe fails, calls are answered
//! by [`simulated::simulate`] instead.

mod driver;
pub mod simulated;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::component::{ComponentDescriptor, ComponentId, ExecutionPath};
use crate::error::{BridgeError, BridgeResult, DiscoveryError, DiscoveryResult};
use crate::extract::{Dialect, Extractor, MetadataFragment};
use crate::loader::ComponentMetadata;

pub use simulated::is_simulated;

/// Timeout for the `--version` probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bridge settings.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Interpreter executable name or path.
    pub interpreter: String,
    /// Per-invocation timeout.
    pub timeout: Duration,
    /// Suffix the component type name must carry.
    pub class_suffix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_owned(),
            timeout: Duration::from_secs(30),
            class_suffix: "Agent".to_owned(),
        }
    }
}

/// Result of the interpreter probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeStatus {
    /// Whether real execution is possible.
    pub available: bool,
    /// Configured interpreter.
    pub interpreter: String,
    /// Version string reported by the interpreter.
    pub version: Option<String>,
    #[serde(skip)]
    resolved: Option<PathBuf>,
}

impl BridgeStatus {
    fn unavailable(interpreter: &str) -> Self {
        Self {
            available: false,
            interpreter: interpreter.to_owned(),
            version: None,
            resolved: None,
        }
    }
}

/// Bridge to the external interpreter.
#[derive(Debug)]
pub struct ExternalBridge {
    config: BridgeConfig,
    extractor: Extractor,
    status: OnceCell<BridgeStatus>,
}

impl ExternalBridge {
    /// Create a bridge. Nothing is probed until [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        let extractor = Extractor::new(config.class_suffix.clone());
        Self {
            config,
            extractor,
            status: OnceCell::new(),
        }
    }

    /// A bridge that never probes and always simulates.
    #[must_use]
    pub fn simulated(config: BridgeConfig) -> Self {
        let status = BridgeStatus::unavailable(&config.interpreter);
        let extractor = Extractor::new(config.class_suffix.clone());
        Self {
            config,
            extractor,
            status: OnceCell::new_with(Some(status)),
        }
    }

    /// Bridge settings.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Probe the interpreter once. Later calls return the cached status.
    pub async fn initialize(&self) -> &BridgeStatus {
        self.status
            .get_or_init(|| probe(&self.config.interpreter))
            .await
    }

    /// Whether the probe succeeded. `false` before the probe has run.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status.get().is_some_and(|s| s.available)
    }

    /// Probe result, or an unavailable status before the probe has run.
    #[must_use]
    pub fn status(&self) -> BridgeStatus {
        self.status
            .get()
            .cloned()
            .unwrap_or_else(|| BridgeStatus::unavailable(&self.config.interpreter))
    }

    /// Statically extract metadata from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::FileRead`] if the file cannot be read.
    /// Extraction itself never fails.
    pub async fn extract_agent_metadata(&self, path: &Path) -> DiscoveryResult<MetadataFragment> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DiscoveryError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let text = String::from_utf8_lossy(&bytes);
        let dialect = Dialect::from_path(path).unwrap_or(Dialect::Python);
        Ok(self.extractor.extract(&text, dialect))
    }

    /// Descriptor shell for a component executed through this bridge.
    #[must_use]
    pub fn create_component_wrapper(
        &self,
        id: ComponentId,
        path: &Path,
        metadata: ComponentMetadata,
    ) -> ComponentDescriptor {
        metadata.into_descriptor(id, ExecutionPath::Bridged, Some(path.to_path_buf()))
    }

    /// Run `capability` from the component at `path`.
    ///
    /// Without an available interpreter this returns a simulated result.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] on spawn failure,
    /// timeout, non-zero exit, unparsable output, or an error raised by the
    /// component.
    pub async fn execute_capability(
        &self,
        path: &Path,
        capability: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> BridgeResult<serde_json::Value> {
        match self.run_capability(path, capability, params).await {
            Err(BridgeError::Unavailable) => Ok(simulated::simulate(capability, params)),
            other => other,
        }
    }

    /// Run `capability` in the interpreter, never simulating.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Unavailable`] when the probe failed or has not
    /// run, plus every error [`execute_capability`](Self::execute_capability)
    /// can return.
    pub async fn run_capability(
        &self,
        path: &Path,
        capability: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> BridgeResult<serde_json::Value> {
        let Some(interpreter) = self
            .status
            .get()
            .filter(|s| s.available)
            .and_then(|s| s.resolved.as_deref())
        else {
            return Err(BridgeError::Unavailable);
        };

        driver::invoke(driver::Invocation {
            interpreter,
            source: path,
            capability,
            type_suffix: &self.config.class_suffix,
            params,
            timeout: self.config.timeout,
        })
        .await
    }
}

async fn probe(interpreter: &str) -> BridgeStatus {
    let resolved = match which::which(interpreter) {
        Ok(p) => p,
        Err(e) => {
            warn!(interpreter, error = %e, "Interpreter not found; bridged calls will be simulated");
            return BridgeStatus::unavailable(interpreter);
        },
    };

    let mut cmd = Command::new(&resolved);
    cmd.arg("--version").kill_on_drop(true);
    let output = match tokio::time::timeout(PROBE_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => output,
        Ok(Ok(output)) => {
            warn!(interpreter, code = ?output.status.code(), "Interpreter version probe failed");
            return BridgeStatus::unavailable(interpreter);
        },
        Ok(Err(e)) => {
            warn!(interpreter, error = %e, "Interpreter version probe failed");
            return BridgeStatus::unavailable(interpreter);
        },
        Err(_) => {
            warn!(interpreter, "Interpreter version probe timed out");
            return BridgeStatus::unavailable(interpreter);
        },
    };

    // Older interpreters print the version on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = [stdout.trim(), stderr.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(str::to_owned);

    info!(
        interpreter,
        path = %resolved.display(),
        version = version.as_deref().unwrap_or("unknown"),
        "External interpreter available"
    );

    BridgeStatus {
        available: true,
        interpreter: interpreter.to_owned(),
        version,
        resolved: Some(resolved),
    }
}
