//! Error types for the capability registry.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while running a capability through the external interpreter.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The interpreter probe failed, so real execution is not possible.
    #[error("external interpreter is not available")]
    Unavailable,

    /// The interpreter process could not be started.
    #[error("failed to spawn interpreter '{interpreter}': {source}")]
    Spawn {
        /// Interpreter that was being launched.
        interpreter: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The process did not finish in time and was killed.
    #[error("bridge invocation timed out after {secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        secs: u64,
    },

    /// The process exited unsuccessfully.
    #[error("interpreter exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code, or -1 when killed by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// Standard output was empty or not a valid result envelope.
    #[error("malformed bridge output: {0}")]
    MalformedOutput(String),

    /// The component raised an error inside the interpreter.
    #[error("{kind}: {message}")]
    Remote {
        /// Exception type name reported by the driver.
        kind: String,
        /// Exception message.
        message: String,
    },
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Non-fatal problems encountered during a discovery pass.
///
/// These never abort discovery. They are logged and recorded in the
/// [`DiscoveryReport`](crate::discovery::DiscoveryReport).
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A directory could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryRead {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A candidate file could not be read.
    #[error("cannot read file {}: {source}", path.display())]
    FileRead {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A candidate file has an extension no loader understands.
    #[error("not a loadable agent source: {}", path.display())]
    NotAnAgent {
        /// Offending file.
        path: PathBuf,
    },
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors returned by registry and dispatcher operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No component is registered under the id.
    #[error("component not found: {0}")]
    ComponentNotFound(String),

    /// The component exists but has no capability with this name.
    #[error("capability '{capability}' not found on component {component}")]
    CapabilityNotFound {
        /// Component id.
        component: String,
        /// Requested capability name.
        capability: String,
    },

    /// A caller-supplied value is missing or out of range.
    #[error("validation failed: missing or invalid field '{field}'")]
    Validation {
        /// The offending field.
        field: String,
    },

    /// The bridged execution failed.
    #[error("bridge execution failed: {0}")]
    Bridge(#[from] BridgeError),

    /// A native handler returned an error.
    #[error("native execution failed: {message}")]
    Native {
        /// Handler-provided description.
        message: String,
    },

    /// Another refresh is already rebuilding the registry.
    #[error("a registry refresh is already in progress")]
    RefreshInProgress,

    /// The operation needs an initialized registry.
    #[error("registry has not been initialized")]
    NotInitialized,
}

impl RegistryError {
    /// Whether the error is one of the `NotFound` kinds.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotFound(_) | Self::CapabilityNotFound { .. }
        )
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
