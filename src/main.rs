use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use salmon_data_loader::batch::load_all;
use salmon_data_loader::config::DataPaths;
use salmon_data_loader::dataset::Dataset;
use salmon_data_loader::loaders::{CpiFrequency, DataLoader};
use salmon_data_loader::table::Table;

#[derive(Parser)]
#[command(name = "salmon-data")]
#[command(about = "Load and clean the salmon market spreadsheets", long_about = None)]
struct Cli {
    /// Directory holding the source workbooks (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load one dataset and print it
    Load {
        /// fish-pool, cpi-annual, cpi-monthly, eurnok, ssb-export, escapes, biomass, pig-price
        dataset: Dataset,

        /// CPI view (annual or monthly); only valid with a CPI dataset
        #[arg(long)]
        frequency: Option<CpiFrequency>,

        /// Print the first N rows instead of the last
        #[arg(long, conflicts_with = "tail")]
        head: Option<usize>,

        /// Print the last N rows
        #[arg(long, default_value = "5")]
        tail: usize,

        /// Print every row
        #[arg(long)]
        all: bool,

        /// Emit JSON records instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Load every dataset and print a summary
    LoadAll {
        /// Number of datasets loaded at once
        #[arg(long, default_value = "4")]
        parallel: usize,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct LoadSummary {
    dataset: Dataset,
    rows: Option<usize>,
    columns: Option<Vec<String>>,
    elapsed_ms: u64,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,salmon_data_loader=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let paths = match &cli.data_dir {
        Some(dir) => DataPaths::in_dir(dir),
        None => DataPaths::from_env(),
    };
    info!("Using data paths: {:?}", paths);
    let loader = Arc::new(DataLoader::new(paths));

    match cli.command {
        Command::Load {
            dataset,
            frequency,
            head,
            tail,
            all,
            json,
        } => {
            let dataset = match (dataset, frequency) {
                (Dataset::CpiAnnual | Dataset::CpiMonthly, Some(f)) => f.dataset(),
                (other, Some(_)) => {
                    return Err(format!("--frequency only applies to CPI, not {other}").into())
                }
                (other, None) => other,
            };
            let loader = Arc::clone(&loader);
            let table = tokio::task::spawn_blocking(move || loader.load(dataset)).await??;

            let shown = if all {
                table
            } else if let Some(n) = head {
                table.head(n)
            } else {
                table.tail(tail)
            };
            print_table(&shown, json)?;
        }
        Command::LoadAll { parallel, json } => {
            load_all_datasets(loader, parallel, json).await?;
        }
    }

    Ok(())
}

fn print_table(table: &Table, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        println!("{table}");
    }
    Ok(())
}

async fn load_all_datasets(
    loader: Arc<DataLoader>,
    parallel: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!(
        "Loading {} datasets ({} at a time)...",
        Dataset::ALL.len(),
        parallel
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let outcomes = load_all(loader, &Dataset::ALL, parallel).await;

    let summaries: Vec<LoadSummary> = outcomes
        .into_iter()
        .map(|o| {
            let elapsed_ms = o.elapsed.as_millis() as u64;
            match o.result {
                Ok(table) => LoadSummary {
                    dataset: o.dataset,
                    rows: Some(table.len()),
                    columns: Some(table.columns().to_vec()),
                    elapsed_ms,
                    error: None,
                },
                Err(e) => LoadSummary {
                    dataset: o.dataset,
                    rows: None,
                    columns: None,
                    elapsed_ms,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    pb.finish_with_message(format!(
        "✓ {} loaded, {} failed in {:.2}s",
        summaries.len() - failed,
        failed,
        start.elapsed().as_secs_f64()
    ));

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    for s in &summaries {
        match (&s.rows, &s.error) {
            (Some(rows), _) => println!(
                "{:<12} {:>8} rows  {:>2} columns  {:>6} ms",
                s.dataset.slug(),
                rows,
                s.columns.as_ref().map_or(0, Vec::len),
                s.elapsed_ms
            ),
            (None, Some(err)) => println!("{:<12} FAILED  {err}", s.dataset.slug()),
            (None, None) => {}
        }
    }
    println!("{}", "=".repeat(80));

    if failed > 0 {
        return Err(format!("{failed} dataset(s) failed to load").into());
    }
    Ok(())
}
