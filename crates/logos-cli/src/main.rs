//! LOGOS CLI - operator front-end for the capability registry.
//!
//! Every command loads the layered config, builds a registry, runs
//! discovery, and then reads from or dispatches against it. Logs go to
//! stderr so `--format json` output on stdout stays machine-readable.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use logos_config::{Config, ResolvedConfig};
use logos_registry::{ComponentFilter, Dispatcher, Feature, Pagination, SortOrder};

mod commands;
mod config_bridge;
mod formatter;
mod theme;

use commands::{components, config, exec, scan, stats};
use formatter::OutputFormat;

/// LOGOS - expert component registry
#[derive(Parser)]
#[command(name = "logos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default) or json
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    /// Path to an explicit configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Discovery root, replacing the configured roots (repeatable)
    #[arg(long = "root", global = true, value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Caller identity recorded with invocations
    #[arg(long, global = true, default_value = "cli")]
    caller: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run discovery and print the report
    Scan,

    /// List components
    List {
        /// Only this category (synonyms accepted)
        #[arg(long)]
        category: Option<String>,

        /// Only components offering this capability
        #[arg(long)]
        capability: Option<String>,

        /// Only components with this feature: audio, marketplace, iot, automotive
        #[arg(long)]
        feature: Option<Feature>,

        /// Free-text filter, ranked by relevance
        #[arg(short, long)]
        query: Option<String>,

        /// Order: popularity, rating, name, discovery
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Items to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Page size (1-100)
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show one component
    Show {
        /// Component id
        id: String,
    },

    /// Search components by name, category, description, and capabilities
    Search {
        /// Search text
        query: String,
    },

    /// List categories with aggregates
    Categories,

    /// Invoke a capability
    Exec {
        /// Component id
        id: String,

        /// Capability name
        capability: String,

        /// Parameter as KEY=VALUE; VALUE is parsed as JSON when possible (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Parameters as one JSON object
        #[arg(long)]
        params_json: Option<String>,
    },

    /// Ask a component a question through its consult capability
    Chat {
        /// Component id
        id: String,

        /// Message text
        message: String,
    },

    /// Rate a component from 0 to 5
    Feedback {
        /// Component id
        id: String,

        /// Rating in [0, 5]
        rating: f64,

        /// Optional comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show registry statistics
    Stats,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration
    Show,
    /// Show config file locations and environment fallbacks
    Paths,
}

fn load_config(cli: &Cli, workspace: Option<&std::path::Path>) -> Result<ResolvedConfig> {
    let resolved = match &cli.config {
        Some(path) => Config::load_with_file(workspace, path)?,
        None => Config::load(workspace)?,
    };
    Ok(resolved)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let workspace = std::env::current_dir().ok();
    let resolved = load_config(&cli, workspace.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(r) = &resolved {
        let mut lc = config_bridge::to_log_config(&r.config);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "warn" };
        logos_telemetry::LogConfig::new(level).with_format(logos_telemetry::LogFormat::Compact)
    };
    if let Err(e) = logos_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let format = OutputFormat::parse(&cli.format);

    // Config commands need no registry.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Show => config::show_config(&resolved?, format),
            ConfigCommands::Paths => {
                config::show_paths(workspace.as_deref(), cli.config.as_deref(), format)
            },
        };
    }

    let resolved = resolved?;
    let registry =
        commands::open_registry(&resolved.config, workspace.as_deref(), &cli.roots).await?;
    let dispatcher = Dispatcher::new(std::sync::Arc::clone(&registry));
    let caller = cli.caller.as_str();

    match cli.command {
        Commands::Scan => scan::run_scan(&registry, format)?,
        Commands::List {
            category,
            capability,
            feature,
            query,
            sort,
            offset,
            limit,
        } => {
            let filter = ComponentFilter {
                category,
                capability,
                feature,
                query,
                sort,
            };
            components::list_components(&registry, &filter, Pagination::new(offset, limit), format)?;
        },
        Commands::Show { id } => components::show_component(&registry, &id, format)?,
        Commands::Search { query } => components::search_components(&registry, &query, format)?,
        Commands::Categories => components::list_categories(&registry, format)?,
        Commands::Exec {
            id,
            capability,
            params,
            params_json,
        } => {
            let params = exec::parse_params(params_json.as_deref(), &params)?;
            exec::run_exec(&dispatcher, &id, &capability, params, caller, format).await?;
        },
        Commands::Chat { id, message } => {
            exec::run_chat(&dispatcher, &id, &message, caller, format).await?;
        },
        Commands::Feedback {
            id,
            rating,
            comment,
        } => {
            exec::run_feedback(&dispatcher, &id, rating, comment.as_deref(), caller, format)?;
        },
        Commands::Stats => stats::show_stats(&registry, format)?,
        Commands::Config { .. } => {},
    }

    Ok(())
}
