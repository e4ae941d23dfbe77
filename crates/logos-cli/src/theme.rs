//! CLI theme and styling.

use colored::Colorize;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format a component id.
    pub(crate) fn component_id(id: &str) -> String {
        format!("{}", id.cyan())
    }

    /// Format a rating as `4.2/5`, colored by band.
    pub(crate) fn rating(rating: f64) -> String {
        let text = format!("{rating:.1}/5");
        if rating >= 4.0 {
            text.green().to_string()
        } else if rating >= 2.5 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    /// Format a boolean flag as a check or a dash.
    pub(crate) fn flag(on: bool) -> String {
        if on {
            "✓".green().to_string()
        } else {
            "-".dimmed().to_string()
        }
    }

    /// Format a timestamp.
    pub(crate) fn timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
        dt.format("%Y-%m-%d %H:%M").to_string().dimmed().to_string()
    }
}
