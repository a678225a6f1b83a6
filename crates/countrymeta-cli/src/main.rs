//! countrymeta - OpenStreetMap country relation and metadata builder
//!
//! Discovers ISO3166-1 country boundary relations, downloads them from the
//! OSM API and writes a relation index plus normalized country metadata.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use cmd::key_value_table;
use config::Config;

#[derive(Parser)]
#[command(name = "countrymeta")]
#[command(about = "Build OSM country relation ids and metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./countrymeta.toml or ~/.config/countrymeta/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    read_timeout: Option<u64>,

    /// Resubmissions of a failing relation request
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Milliseconds each worker waits before a request
    #[arg(long, global = true)]
    request_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Discover, fetch and reshape; write both artifacts
    Build(cmd::build::BuildArgs),
    /// Discover and fetch relations; write the relation index
    Fetch(cmd::fetch::FetchArgs),
    /// Rebuild the metadata artifact from cached relations
    Reshape(cmd::reshape::ReshapeArgs),
    /// Inspect or clear the relation cache
    Cache(cmd::cache::CacheArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(countrymeta_core::ProgressContext::new());

    let multi = progress.is_tty().then(|| progress.multi());
    countrymeta_core::init_logging(cli.quiet, cli.debug, multi);

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Config file defaults, CLI overrides
    let http_config = config.http_config(cli.read_timeout, cli.max_retries, cli.request_delay_ms);
    countrymeta_core::set_http_config(http_config);

    match cli.command {
        Command::Build(args) => cmd::build::run(args, &config, &progress),
        Command::Fetch(args) => cmd::fetch::run(args, &config, &progress),
        Command::Reshape(args) => cmd::reshape::run(args, &config, &progress),
        Command::Cache(args) => cmd::cache::run(args, &config),
        Command::Config => {
            let http = countrymeta_core::http_config();
            let supplementary: Vec<String> = config
                .osm
                .supplementary_ids
                .iter()
                .map(|id| id.to_string())
                .collect();

            let rows = [
                ("Output directory", config.output.dir.display().to_string()),
                ("Build directory", config.build.dir.display().to_string()),
                (
                    "Workers",
                    format!("{} (max: {})", config.workers.default, config.workers.max),
                ),
                ("Overpass URL", config.osm.overpass_url.clone()),
                ("Relation URL", config.osm.relation_url.clone()),
                ("Supplementary IDs", supplementary.join(", ")),
                ("Read timeout", format!("{}s", http.read_timeout.as_secs())),
                ("Max retries", http.max_retries.to_string()),
                (
                    "Request delay",
                    format!("{}ms", http.request_delay.as_millis()),
                ),
                ("User agent", http.user_agent.clone()),
            ];

            eprintln!("\n{}", key_value_table(("Setting", "Value"), &rows));
            Ok(())
        }
    }
}
