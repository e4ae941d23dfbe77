//! Scan command - run discovery and report what was found.

use logos_registry::{DiscoveryReport, Registry};
use serde::Serialize;

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanOutput<'a> {
    report: &'a DiscoveryReport,
    bridge: logos_registry::BridgeStatus,
    roots: Vec<String>,
}

/// Print the discovery report of an initialized registry.
pub(crate) fn run_scan(registry: &Registry, format: OutputFormat) -> anyhow::Result<()> {
    let report = registry.last_report();
    let bridge = registry.bridge().status();
    let roots: Vec<String> = registry
        .config()
        .roots
        .iter()
        .map(|r| r.display().to_string())
        .collect();

    if format.is_json() {
        return print_json(&ScanOutput {
            report: &report,
            bridge,
            roots,
        });
    }

    println!("\n{}", Theme::header("Discovery"));
    println!("{}", Theme::separator());
    for root in &roots {
        println!("  {}", Theme::kv("root", root));
    }
    println!("  {}", Theme::kv("loaded", &report.loaded.to_string()));
    println!("  {}", Theme::kv("native", &report.native.to_string()));
    println!(
        "  {}",
        Theme::kv("duplicates", &report.skipped_duplicates.to_string())
    );
    println!("  {}", Theme::kv("failed", &report.failed.to_string()));

    if !report.by_category.is_empty() {
        println!("\n{}", Theme::header("By category"));
        for (category, count) in &report.by_category {
            println!("  {category:<24} {count:>5}");
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", Theme::header("Warnings"));
        for w in &report.warnings {
            println!("  {}", Theme::warning(&w.message));
        }
    }

    println!();
    if bridge.available {
        let version = bridge.version.as_deref().unwrap_or("unknown version");
        println!(
            "{}",
            Theme::success(&format!("Bridge: {} ({version})", bridge.interpreter))
        );
    } else {
        println!(
            "{}",
            Theme::warning(&format!(
                "Bridge: {} not available, bridged capabilities are simulated",
                bridge.interpreter
            ))
        );
    }
    Ok(())
}
