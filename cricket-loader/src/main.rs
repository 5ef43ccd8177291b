use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use cricket_core::storage::{SqliteStorage, Storage};
use cricket_loader::config::LoaderConfig;
use cricket_loader::ingest::FileDocumentSource;
use cricket_loader::observability::logging::init_logging;
use cricket_loader::pipeline::{BatchLoader, LoadReport};

#[derive(Parser)]
#[command(name = "cricket-loader")]
#[command(about = "Normalizes cricket match archives into a relational store")]
#[command(version = "0.1.0")]
struct Cli {
    /// Optional TOML config file
    #[arg(long, default_value = "cricket.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the store from a directory of match documents
    Load {
        /// Directory of extracted .json match documents
        #[arg(long)]
        input: Option<PathBuf>,
        /// SQLite database path
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Print summary statistics from a previously loaded store
    Stats {
        /// SQLite database path
        #[arg(long)]
        database: Option<PathBuf>,
        /// How many batters to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = LoaderConfig::load_from(&cli.config)?;
    init_logging(&config.log_dir);

    match cli.command {
        Commands::Load { input, database } => {
            let input = input.unwrap_or_else(|| config.input_dir.clone());
            let database = database.unwrap_or_else(|| config.database_path.clone());
            info!(
                "Rebuilding store at {} from {}",
                database.display(),
                input.display()
            );

            let storage = SqliteStorage::open(&database)?;
            storage.reset_schema()?;
            let storage: Arc<dyn Storage> = Arc::new(storage);

            let loader = BatchLoader::new(storage);
            let report = loader.load_dir(&FileDocumentSource::new(input)).await?;
            print_report(&report);
        }
        Commands::Stats { database, limit } => {
            let database = database.unwrap_or_else(|| config.database_path.clone());
            let storage = SqliteStorage::open(&database)?;
            print_stats(&storage, limit).await?;
        }
    }

    Ok(())
}

fn print_report(report: &LoadReport) {
    println!(
        "✅ Load complete: {} documents loaded, {} failed",
        report.documents_processed,
        report.documents_failed()
    );
    println!(
        "   players: {}  matches: {}  innings: {}  deliveries: {}",
        report.players_upserted,
        report.matches_inserted,
        report.innings_inserted,
        report.deliveries_inserted
    );
    for failure in &report.failures {
        println!("   ⚠️  {}: {}", failure.document_ref, failure.reason);
    }
}

async fn print_stats(storage: &SqliteStorage, limit: usize) -> Result<()> {
    let counts = storage.table_counts().await?;
    println!(
        "Rows: players={} matches={} innings={} deliveries={}",
        counts.players, counts.matches, counts.innings, counts.deliveries
    );

    println!("\nWins by season and gender:");
    for row in storage.season_win_summary().await? {
        println!(
            "  {:<10} {:<8} {:<28} {:>4}",
            row.season, row.gender, row.team, row.wins
        );
    }

    println!("\nTop strike rates:");
    for row in storage.top_strike_rates(limit).await? {
        println!(
            "  {:<28} {:>5} balls {:>5} runs  {:>7.2}",
            row.player, row.balls, row.runs, row.strike_rate
        );
    }

    Ok(())
}
