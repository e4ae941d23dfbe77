//! Stats command - registry-wide counters and bridge health.

use logos_registry::Registry;

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

/// Print [`logos_registry::SystemStats`].
pub(crate) fn show_stats(registry: &Registry, format: OutputFormat) -> anyhow::Result<()> {
    let stats = registry.system_stats();
    if format.is_json() {
        return print_json(&stats);
    }

    println!("\n{}", Theme::header("Registry"));
    println!("{}", Theme::separator());
    println!(
        "  {}",
        Theme::kv("components", &stats.total_components.to_string())
    );
    println!(
        "  {}",
        Theme::kv("categories", &stats.total_categories.to_string())
    );
    println!(
        "  {}",
        Theme::kv(
            "capabilities",
            &format!(
                "{} ({} unique)",
                stats.capabilities.total, stats.capabilities.unique
            )
        )
    );
    println!(
        "  {}",
        Theme::kv(
            "features",
            &format!(
                "audio {}, marketplace {}, iot {}, automotive {}",
                stats.features.audio,
                stats.features.marketplace,
                stats.features.iot,
                stats.features.automotive
            )
        )
    );
    println!("  {}", Theme::kv("state", &format!("{:?}", stats.state).to_lowercase()));

    let bridge = if stats.bridge.available {
        format!(
            "{} {}",
            stats.bridge.interpreter,
            stats.bridge.version.as_deref().unwrap_or("")
        )
    } else {
        format!("{} (unavailable, simulating)", stats.bridge.interpreter)
    };
    println!("  {}", Theme::kv("bridge", bridge.trim()));

    if !stats.components_by_category.is_empty() {
        println!("\n{}", Theme::header("By category"));
        for (category, count) in &stats.components_by_category {
            let caps = stats
                .capabilities
                .by_category
                .get(category)
                .copied()
                .unwrap_or_default();
            println!("  {category:<24} {count:>5} {}", Theme::dimmed(&format!("{caps} caps")));
        }
    }

    if !stats.top_components.is_empty() {
        println!("\n{}", Theme::header("Most used"));
        for item in &stats.top_components {
            println!(
                "  {:<36} {:>6} {}",
                Theme::component_id(&item.id),
                item.metadata.usage,
                Theme::rating(item.metadata.rating)
            );
        }
    }

    if !stats.recently_added.is_empty() {
        println!("\n{}", Theme::header("Recently added"));
        for item in &stats.recently_added {
            println!("  {}", Theme::component_id(&item.id));
        }
    }
    println!();
    Ok(())
}
