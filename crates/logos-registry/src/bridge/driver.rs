//! One-shot interpreter invocation.
//!
//! Each call spawns a fresh interpreter running the embedded driver script,
//! writes the params as JSON on stdin, and reads a single JSON envelope back
//! from stdout. The child is killed if the timeout elapses or the future is
//! dropped.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};

/// Driver program passed to the interpreter with `-c`.
pub(crate) const DRIVER_SCRIPT: &str = include_str!("driver.py");

/// Upper bound on stderr carried in an error.
const MAX_STDERR_BYTES: usize = 4096;

/// Result envelope printed by the driver.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Everything needed for a single invocation.
pub(crate) struct Invocation<'a> {
    pub(crate) interpreter: &'a Path,
    pub(crate) source: &'a Path,
    pub(crate) capability: &'a str,
    pub(crate) type_suffix: &'a str,
    pub(crate) params: &'a serde_json::Map<String, serde_json::Value>,
    pub(crate) timeout: Duration,
}

/// Run one capability in a new interpreter process.
pub(crate) async fn invoke(call: Invocation<'_>) -> BridgeResult<serde_json::Value> {
    let payload = serde_json::to_vec(call.params)
        .map_err(|e| BridgeError::MalformedOutput(format!("unserializable params: {e}")))?;

    let mut cmd = Command::new(call.interpreter);
    cmd.arg("-c")
        .arg(DRIVER_SCRIPT)
        .arg(call.source)
        .arg(call.capability)
        .arg(call.type_suffix)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = call.source.parent() {
        cmd.current_dir(dir);
    }

    debug!(
        interpreter = %call.interpreter.display(),
        source = %call.source.display(),
        capability = call.capability,
        "Spawning bridge process"
    );

    let mut child = cmd.spawn().map_err(|e| BridgeError::Spawn {
        interpreter: call.interpreter.display().to_string(),
        source: e,
    })?;

    // Dropping the in-flight future on timeout drops the child, and
    // kill_on_drop reaps it.
    let output = match timeout(call.timeout, async {
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&payload).await {
                debug!(error = %e, "Failed to write params to bridge process");
            }
            if let Err(e) = stdin.shutdown().await {
                debug!(error = %e, "Failed to close bridge process stdin");
            }
        }
        child.wait_with_output().await
    })
    .await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(BridgeError::Spawn {
                interpreter: call.interpreter.display().to_string(),
                source: e,
            });
        },
        Err(_) => {
            warn!(
                source = %call.source.display(),
                capability = call.capability,
                timeout_secs = call.timeout.as_secs(),
                "Bridge process timed out"
            );
            return Err(BridgeError::Timeout {
                secs: call.timeout.as_secs(),
            });
        },
    };

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = truncate(&String::from_utf8_lossy(&output.stderr));
        warn!(code, stderr = %stderr, "Bridge process failed");
        return Err(BridgeError::NonZeroExit { code, stderr });
    }

    parse_output(&String::from_utf8_lossy(&output.stdout))
}

/// Decode the driver envelope from the last non-empty stdout line.
pub(crate) fn parse_output(stdout: &str) -> BridgeResult<serde_json::Value> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| BridgeError::MalformedOutput("no output".to_owned()))?;

    let envelope: Envelope = serde_json::from_str(line)
        .map_err(|e| BridgeError::MalformedOutput(format!("{e}: {}", truncate(line))))?;

    if envelope.ok {
        Ok(envelope.result)
    } else {
        Err(BridgeError::Remote {
            kind: envelope.kind.unwrap_or_else(|| "Error".to_owned()),
            message: envelope.error.unwrap_or_default(),
        })
    }
}

fn truncate(s: &str) -> String {
    if s.len() <= MAX_STDERR_BYTES {
        return s.trim().to_owned();
    }
    let mut end = MAX_STDERR_BYTES;
    while !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    format!("{}...", s.get(..end).unwrap_or(""))
}
