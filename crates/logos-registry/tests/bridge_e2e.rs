//! End-to-end bridge tests against a real interpreter.
//!
//! These tests require `python3` to be on `$PATH`. They are skipped
//! automatically if it is not available.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use logos_registry::prelude::*;
use logos_registry::is_simulated;
use serde_json::{Map, Value, json};

const CALC_AGENT: &str = r#"
import time


class CalcAgent:
    def add(self, a, b):
        """Add two numbers."""
        print("noise that must not break the envelope")
        return {"sum": a + b}

    async def echo(self, text: str):
        """Echo text back."""
        return text

    def explode(self):
        """Always fails."""
        raise ValueError("boom")

    def sleep(self, seconds):
        """Sleep for a while."""
        time.sleep(seconds)
        return None
"#;

/// Returns `true` when the interpreter is available on `$PATH`.
fn python_available() -> bool {
    which::which("python3").is_ok()
}

fn write_agent(root: &Path) {
    let dir = root.join("math");
    std::fs::create_dir_all(&dir).expect("create dir");
    std::fs::write(dir.join("calc_agent.py"), CALC_AGENT).expect("write agent");
}

async fn dispatcher(root: &Path, timeout: Duration) -> Dispatcher {
    let registry = Registry::new(
        RegistryConfig::with_roots([root]),
        BridgeConfig {
            timeout,
            ..BridgeConfig::default()
        },
    );
    registry.initialize().await.expect("initialize");
    Dispatcher::new(Arc::new(registry))
}

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[tokio::test]
async fn executes_sync_and_async_capabilities() {
    if !python_available() {
        eprintln!("python3 not found, skipping");
        return;
    }
    let tmp = tempfile::tempdir().expect("tempdir");
    write_agent(tmp.path());
    let d = dispatcher(tmp.path(), Duration::from_secs(30)).await;
    assert!(d.registry().bridge().is_available());

    let out = d
        .execute_capability("mathematics-calc-expert", "add", params(json!({ "a": 2, "b": 3 })), "alice")
        .await
        .expect("add");
    assert!(!is_simulated(&out.result));
    assert_eq!(out.result, json!({ "sum": 5 }));

    let out = d
        .execute_capability("mathematics-calc-expert", "echo", params(json!({ "text": "hi" })), "alice")
        .await
        .expect("echo");
    assert_eq!(out.result, json!("hi"));
}

#[tokio::test]
async fn remote_errors_surface_with_type() {
    if !python_available() {
        eprintln!("python3 not found, skipping");
        return;
    }
    let tmp = tempfile::tempdir().expect("tempdir");
    write_agent(tmp.path());
    let d = dispatcher(tmp.path(), Duration::from_secs(30)).await;

    let err = d
        .execute_capability("mathematics-calc-expert", "explode", Map::new(), "alice")
        .await
        .expect_err("explode fails");
    match err {
        RegistryError::Bridge(BridgeError::Remote { kind, message }) => {
            assert_eq!(kind, "ValueError");
            assert_eq!(message, "boom");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_capabilities_time_out() {
    if !python_available() {
        eprintln!("python3 not found, skipping");
        return;
    }
    let tmp = tempfile::tempdir().expect("tempdir");
    write_agent(tmp.path());
    let d = dispatcher(tmp.path(), Duration::from_secs(1)).await;

    let err = d
        .execute_capability("mathematics-calc-expert", "sleep", params(json!({ "seconds": 10 })), "alice")
        .await
        .expect_err("sleep times out");
    assert!(matches!(err, RegistryError::Bridge(BridgeError::Timeout { secs: 1 })));
}

const QUIT_AGENT: &str = r#"
import sys

sys.stderr.write("refusing to load\n")
sys.exit(3)


class QuitAgent:
    def ping(self):
        """Respond to a ping."""
        return "pong"
"#;

#[tokio::test]
async fn non_zero_exit_carries_code_and_stderr() {
    if !python_available() {
        eprintln!("python3 not found, skipping");
        return;
    }
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("math");
    std::fs::create_dir_all(&dir).expect("create dir");
    std::fs::write(dir.join("quit_agent.py"), QUIT_AGENT).expect("write agent");
    let d = dispatcher(tmp.path(), Duration::from_secs(30)).await;

    let err = d
        .execute_capability("mathematics-quit-expert", "ping", Map::new(), "alice")
        .await
        .expect_err("import exits");
    match err {
        RegistryError::Bridge(BridgeError::NonZeroExit { code, stderr }) => {
            assert_eq!(code, 3);
            assert!(stderr.contains("refusing to load"));
        },
        other => panic!("unexpected error: {other}"),
    }
}
