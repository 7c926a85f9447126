use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use roster::{logging, Config};

mod commands;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(about = "Maintenance tasks for the roster member directory", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $ROSTER_CONFIG or ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Load countries from a tab-separated file (code, name, is_under_represented)
    ImportCountries {
        path: PathBuf,
    },
    /// Wipe the directory and fill it with random fixture data
    Seed(commands::seed::SeedArgs),
    /// Run a directory search and print matching profiles as JSON lines
    Search {
        /// Search terms
        #[arg(short, long)]
        s: Option<String>,
        /// Only under-represented countries
        #[arg(long)]
        ur: bool,
        /// Only senior positions
        #[arg(long)]
        senior: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_simple_logging();

    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path.as_path()), roster::config::environment())?,
        None => Config::load()?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::ImportCountries { path } => commands::import_countries::run(&config, &path).await?,
        Commands::Seed(args) => commands::seed::run(&config, args).await?,
        Commands::Search { s, ur, senior } => commands::search::run(config, s, ur, senior).await?,
    }

    Ok(())
}
