use clap::{ArgAction, Parser, Subcommand};
use commands::{bootstrap, sync, views};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviemap")]
#[command(about = "MovieMap - map your watchlists onto the countries that made them")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile source exports with the movie database
    #[command(
        long_about = "Parse every CSV export under the input directory, fetch metadata for movies not yet in the database, apply completed manual override entries, refresh user ratings, and rewrite the database, list references and country table."
    )]
    Sync {
        /// Skip metadata fetching; new movies go straight to the manual queue
        #[arg(long, action = ArgAction::SetTrue)]
        no_fetch: bool,
    },
    /// Rebuild the published per-country views from the current database
    Views,
    /// Migrate a legacy per-country view file into the database layout
    #[command(
        long_about = "One-time migration for data produced before the central database existed: reads a legacy movies-by-country JSON file plus the input CSV exports and writes the database and list reference files."
    )]
    Bootstrap {
        /// Path to the legacy movies-by-country.json file
        legacy_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Sync { no_fetch } => sync::run_sync(no_fetch, &output).await,
        Commands::Views => views::run_views(&output),
        Commands::Bootstrap { legacy_file } => bootstrap::run_bootstrap(&legacy_file, &output),
    };

    result.map_err(|e| color_eyre::eyre::eyre!("{:#}", e))
}
