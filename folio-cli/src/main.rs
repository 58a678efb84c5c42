//! Folio CLI - Command-line interface for the book tracker

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use folio_core::ReadingStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Library directory (defaults to $FOLIO_LIBRARY or ./folio_data)
    #[arg(long, global = true)]
    library: Option<String>,

    /// Genre taxonomy JSON file (defaults to $FOLIO_TAXONOMY or the built-in table)
    #[arg(long, global = true)]
    taxonomy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an FB2 book into the library
    Import {
        /// Input file path
        input: String,

        /// Initial reading status (planned, reading, read)
        #[arg(short, long, default_value = "planned")]
        status: ReadingStatus,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display information about an FB2 book
    Info {
        /// Input file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an FB2 file
    Validate {
        /// Input file path
        input: String,
    },

    /// Print the reading blocks of an FB2 book
    Blocks {
        /// Input file path
        input: String,

        /// Print at most this many blocks
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Batch import every FB2 file in a directory
    Batch {
        /// Input directory
        input_dir: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// List the books in the library
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the stored reading position of a book
    Position {
        /// Book identifier
        id: String,
    },

    /// Record a viewport report as the reading position of a book
    Capture {
        /// Book identifier
        id: String,

        /// Index of the first visible block
        #[arg(short, long)]
        block: usize,

        /// Top edge of that block relative to the viewport top (negative when scrolled past)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        top: i64,

        /// Rendered height of that block
        #[arg(long)]
        height: Option<i64>,
    },

    /// Change the reading status of a book
    Status {
        /// Book identifier
        id: String,

        /// New status (planned, reading, read)
        status: ReadingStatus,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::resolve(cli.library, cli.taxonomy);

    match cli.command {
        Commands::Import {
            input,
            status,
            json,
        } => commands::import(&config, &input, status, json).await,

        Commands::Info { input, json } => commands::info(&config, &input, json),

        Commands::Validate { input } => commands::validate(&input),

        Commands::Blocks { input, limit } => commands::blocks(&input, limit),

        Commands::Batch { input_dir, jobs } => commands::batch(&config, &input_dir, jobs).await,

        Commands::List { json } => commands::list(&config, json).await,

        Commands::Position { id } => commands::position(&config, &id).await,

        Commands::Capture {
            id,
            block,
            top,
            height,
        } => commands::capture(&config, &id, block, top, height).await,

        Commands::Status { id, status } => commands::status(&config, &id, status).await,
    }
}
