//! Config command - show the resolved configuration and where it came from.

use std::path::Path;

use colored::Colorize;
use logos_config::ResolvedConfig;
use logos_config::env::known_env_vars;
use logos_config::loader::candidate_paths;

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

/// Print the merged configuration.
pub(crate) fn show_config(resolved: &ResolvedConfig, format: OutputFormat) -> anyhow::Result<()> {
    if format.is_json() {
        return print_json(resolved);
    }

    println!("{}", resolved.to_toml()?);
    if resolved.loaded_files.is_empty() {
        println!("{}", Theme::dimmed("# no config files found, using defaults"));
    } else {
        for file in &resolved.loaded_files {
            println!("{}", Theme::dimmed(&format!("# loaded {file}")));
        }
    }
    Ok(())
}

/// Print every config location checked and the recognised env vars.
pub(crate) fn show_paths(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let paths = candidate_paths(workspace, None, explicit);

    if format.is_json() {
        let entries: Vec<_> = paths
            .iter()
            .map(|(layer, path)| {
                serde_json::json!({
                    "layer": layer.to_string(),
                    "path": path.display().to_string(),
                    "exists": path.is_file(),
                })
            })
            .collect();
        return print_json(&entries);
    }

    println!("\n{}", Theme::header("Config files (lowest priority first)"));
    println!("{}", Theme::separator());
    for (layer, path) in &paths {
        let status = if path.is_file() {
            "found".green().to_string()
        } else {
            Theme::dimmed("missing")
        };
        println!("  {:<32} {} {status}", layer.to_string(), path.display());
    }

    println!("\n{}", Theme::header("Environment fallbacks"));
    for (var, field) in known_env_vars() {
        let set = std::env::var_os(var).is_some();
        println!("  {:<28} {:<22} {}", var, field, Theme::flag(set));
    }
    println!();
    Ok(())
}
