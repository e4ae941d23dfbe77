//! Component commands - list, show, search, and browse categories.

use colored::Colorize;
use logos_registry::listing::ListingItem;
use logos_registry::{ComponentDescriptor, ComponentFilter, Pagination, Registry};

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

fn print_items(items: &[ListingItem]) {
    println!(
        "  {:<36} {:<18} {:>5} {:>7} {:>6}",
        "ID".dimmed(),
        "CATEGORY".dimmed(),
        "CAPS".dimmed(),
        "RATING".dimmed(),
        "USES".dimmed()
    );
    println!("{}", Theme::separator());
    for item in items {
        println!(
            "  {:<36} {:<18} {:>5} {:>7} {:>6}",
            Theme::component_id(&item.id),
            item.category,
            item.capabilities.len(),
            Theme::rating(item.metadata.rating),
            item.metadata.usage
        );
    }
}

/// List components matching `filter`.
pub(crate) fn list_components(
    registry: &Registry,
    filter: &ComponentFilter,
    pagination: Pagination,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = registry.list_components(filter, pagination);
    if format.is_json() {
        return print_json(&page);
    }

    if page.items.is_empty() {
        println!("{}", Theme::info("No components match"));
        return Ok(());
    }

    println!("\n{}", Theme::header("Components"));
    print_items(&page.items);
    let last = page.offset.saturating_add(page.items.len());
    println!(
        "\n{}",
        Theme::dimmed(&format!(
            "showing {}-{last} of {}",
            page.offset.saturating_add(1),
            page.total
        ))
    );
    Ok(())
}

/// Show one component in full.
pub(crate) fn show_component(
    registry: &Registry,
    id: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Some(d) = registry.get_component(id) else {
        anyhow::bail!("component not found: {id}");
    };
    if format.is_json() {
        return print_json(&d);
    }
    print_descriptor(&d);
    Ok(())
}

fn print_descriptor(d: &ComponentDescriptor) {
    println!("\n{}", Theme::header(&d.name));
    println!("{}", Theme::separator());
    println!("  {}", Theme::kv("id", &Theme::component_id(d.id.as_str())));
    println!("  {}", Theme::kv("category", &d.category));
    println!("  {}", Theme::kv("description", &d.description));
    println!("  {}", Theme::kv("version", &d.version));
    println!("  {}", Theme::kv("author", &d.author));
    println!(
        "  {}",
        Theme::kv("execution", &format!("{:?}", d.execution_path).to_lowercase())
    );
    if let Some(path) = &d.source_path {
        println!("  {}", Theme::kv("source", &path.display().to_string()));
    }

    let f = &d.feature_flags;
    println!(
        "  {}   audio {}  marketplace {}  iot {}  automotive {}",
        "features".bold(),
        Theme::flag(f.audio_enabled),
        Theme::flag(f.marketplace_enabled),
        Theme::flag(f.iot_enabled),
        Theme::flag(f.automotive_enabled),
    );
    println!(
        "  {}   {}  {} use(s)  updated {}",
        "stats".bold(),
        Theme::rating(d.stats.rating),
        d.stats.usage_count,
        Theme::timestamp(&d.stats.last_updated)
    );

    println!("\n{}", Theme::header("Capabilities"));
    for cap in &d.capabilities {
        println!("  {}  {}", cap.name.bold(), Theme::dimmed(&cap.description));
        for p in &cap.parameters {
            let marker = if cap.required_parameters.contains(&p.name) {
                "*".red().to_string()
            } else {
                " ".to_owned()
            };
            println!("      {marker}{}: {}", p.name, Theme::dimmed(&p.hint));
        }
    }
    println!();
}

/// Search by weighted relevance.
pub(crate) fn search_components(
    registry: &Registry,
    query: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let hits: Vec<ListingItem> = registry
        .search(query)
        .iter()
        .map(ListingItem::from)
        .collect();
    if format.is_json() {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("{}", Theme::info(&format!("No components match '{query}'")));
        return Ok(());
    }
    println!("\n{}", Theme::header(&format!("Results for '{query}'")));
    print_items(&hits);
    println!("\n{}", Theme::dimmed(&format!("{} result(s)", hits.len())));
    Ok(())
}

/// List non-empty categories with their aggregates.
pub(crate) fn list_categories(registry: &Registry, format: OutputFormat) -> anyhow::Result<()> {
    let categories = registry.get_all_categories();
    if format.is_json() {
        return print_json(&categories);
    }

    if categories.is_empty() {
        println!("{}", Theme::info("No categories"));
        return Ok(());
    }
    println!("\n{}", Theme::header("Categories"));
    println!(
        "  {:<20} {:<26} {:>6} {:>6}",
        "ID".dimmed(),
        "NAME".dimmed(),
        "COMPS".dimmed(),
        "CAPS".dimmed()
    );
    println!("{}", Theme::separator());
    for c in &categories {
        println!(
            "  {:<20} {:<26} {:>6} {:>6}",
            c.id, c.display_name, c.component_count, c.capability_count
        );
    }
    println!();
    Ok(())
}
