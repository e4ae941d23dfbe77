//! Invocation commands - exec, chat, and feedback.

use anyhow::Context;
use colored::Colorize;
use logos_registry::{Dispatcher, ExecutionOutcome, is_simulated};
use serde_json::{Map, Value};

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

/// Build a params object from `--params-json` and `--param key=value`.
///
/// Pairs are applied after the JSON object, so they win on conflicts.
/// Each value is read as JSON when it parses, else as a plain string.
pub(crate) fn parse_params(
    json: Option<&str>,
    pairs: &[String],
) -> anyhow::Result<Map<String, Value>> {
    let mut params = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("invalid --params-json")? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--params-json must be a JSON object"),
        },
        None => Map::new(),
    };

    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            anyhow::bail!("--param expects KEY=VALUE, got '{pair}'");
        };
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("--param has an empty key: '{pair}'");
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        params.insert(key.to_owned(), value);
    }
    Ok(params)
}

fn print_outcome(outcome: &ExecutionOutcome, format: OutputFormat) -> anyhow::Result<()> {
    if format.is_json() {
        return print_json(outcome);
    }

    let label = format!("{} / {}", outcome.component_id, outcome.capability_name);
    println!("{}", Theme::success(&label));
    if is_simulated(&outcome.result) {
        println!(
            "{}",
            Theme::warning("Simulated result: the external interpreter is not available")
        );
    }
    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    Ok(())
}

/// Invoke one capability.
pub(crate) async fn run_exec(
    dispatcher: &Dispatcher,
    id: &str,
    capability: &str,
    params: Map<String, Value>,
    caller: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let outcome = dispatcher
        .execute_capability(id, capability, params, caller)
        .await?;
    print_outcome(&outcome, format)
}

/// Send a free-text message to a component's `consult` capability.
pub(crate) async fn run_chat(
    dispatcher: &Dispatcher,
    id: &str,
    message: &str,
    caller: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let outcome = dispatcher.chat(id, message, caller).await?;
    if format.is_json() {
        return print_json(&outcome);
    }

    // Prefer the conversational field when the result has one.
    let reply = ["response", "answer", "reply", "content"]
        .iter()
        .find_map(|k| outcome.result.get(*k).and_then(Value::as_str));
    match reply {
        Some(text) => {
            println!("{} {text}", format!("{id}>").cyan().bold());
            if is_simulated(&outcome.result) {
                println!("{}", Theme::dimmed("(simulated)"));
            }
            Ok(())
        },
        None => print_outcome(&outcome, format),
    }
}

/// Submit a rating.
pub(crate) fn run_feedback(
    dispatcher: &Dispatcher,
    id: &str,
    rating: f64,
    comment: Option<&str>,
    caller: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stats = dispatcher.submit_feedback(id, rating, comment, caller)?;
    if format.is_json() {
        return print_json(&stats);
    }
    println!(
        "{}",
        Theme::success(&format!(
            "Rating recorded for {id}; now {}",
            Theme::rating(stats.rating)
        ))
    );
    Ok(())
}
