//! meteo-tools: host for the Open-Meteo function tools.
//!
//! Usage:
//!   meteo-tools list                             Print tool schemas
//!   meteo-tools call get_weather --args '{..}'   Dispatch one tool call
//!   meteo-tools init                             Write a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;
use tracing::info;

use meteo_tools::config::{self, MeteoConfig};
use meteo_tools::open_meteo::OpenMeteoClient;
use meteo_tools::tools::{self, ToolRegistry};
use meteo_tools::types::ToolCall;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "meteo-tools")]
#[command(version)]
#[command(about = "Weather function tools backed by Open-Meteo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file.
    #[arg(long)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the registered tool schemas as JSON.
    List,

    /// Dispatch a single tool call and print its output.
    Call {
        /// Tool name, e.g. get_weather.
        name: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(config::resolve_path)
        .unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => cmd_list(&cfg),
        Commands::Call { name, args } => cmd_call(&cfg, &name, &args).await,
        Commands::Init { force } => cmd_init(&config_path, force),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_list(cfg: &MeteoConfig) -> Result<()> {
    let registry = build_registry(cfg)?;
    println!("{}", serde_json::to_string_pretty(&registry.function_schemas())?);
    Ok(())
}

async fn cmd_call(cfg: &MeteoConfig, name: &str, args: &str) -> Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).context("--args must be valid JSON")?;
    let registry = build_registry(cfg)?;

    let call = ToolCall {
        id: format!("cli-{}", std::process::id()),
        name: name.to_string(),
        arguments,
    };
    info!("Calling '{}'", call.name);

    let result = registry.execute(&call).await;
    if result.success {
        println!("{}", result.output);
        Ok(())
    } else {
        eprintln!("{} {}", "Error:".red().bold(), result.output);
        std::process::exit(1);
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        eprintln!(
            "{} Config already exists at {}. Pass --force to overwrite.",
            "Error:".red().bold(),
            config_path.display()
        );
        std::process::exit(1);
    }

    config::save_config(&MeteoConfig::default(), config_path)?;
    println!("{} Wrote {}", ">>>".green().bold(), config_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_registry(cfg: &MeteoConfig) -> Result<ToolRegistry> {
    let client = OpenMeteoClient::from_config(cfg)?;
    Ok(tools::weather_registry(client))
}
