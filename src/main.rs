//! CLI entry point for the annual rollup tool.
//!
//! Provides subcommands for recomputing a single year's rollup and for
//! backfilling a range of years with bounded parallelism.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sotd_rollup::output::{export_csv, write_annual};
use sotd_rollup::rollup::annual::rollup_year;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sotd-rollup")]
#[command(about = "Rolls monthly shave-of-the-day summaries into annual summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute the annual rollup for one year
    Rollup {
        /// Target year (4 digits)
        year: i32,

        /// Data directory holding aggregated/ and enriched/
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Optional: also export category tables as CSV into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Recompute annual rollups for a range of years
    Backfill {
        /// First year of the range, inclusive
        start: i32,

        /// Last year of the range, inclusive
        end: i32,

        /// Data directory holding aggregated/ and enriched/
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Maximum number of years processed concurrently
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sotd_rollup.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sotd_rollup.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rollup {
            year,
            data_dir,
            csv_dir,
        } => {
            let summary = rollup_year(&data_dir, year)?;
            write_annual(&data_dir, &summary)?;
            if let Some(csv_dir) = csv_dir {
                export_csv(&csv_dir, &summary)?;
            }
        }
        Commands::Backfill {
            start,
            end,
            data_dir,
            concurrency,
        } => {
            backfill(start, end, &data_dir, concurrency).await?;
        }
    }

    Ok(())
}

/// Recomputes every year in `[start, end]`, at most `concurrency` years at a
/// time. Each year runs in its own worker; a failing year is reported and
/// the rest of the batch continues.
#[tracing::instrument(skip(data_dir))]
async fn backfill(start: i32, end: i32, data_dir: &Path, concurrency: usize) -> Result<()> {
    if start > end {
        anyhow::bail!("start year {start} is after end year {end}");
    }

    let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));
    let mut tasks = vec![];

    for year in start..=end {
        let sem = semaphore.clone();
        let data_dir = data_dir.to_path_buf();

        let task = tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();

            let result = tokio::task::spawn_blocking(move || {
                let summary = rollup_year(&data_dir, year)?;
                write_annual(&data_dir, &summary)?;
                Ok::<_, anyhow::Error>(summary)
            })
            .await;

            match result {
                Ok(Ok(summary)) => {
                    info!(
                        year,
                        total_shaves = summary.meta.total_shaves,
                        included_months = summary.meta.included_months.len(),
                        "Year rolled up"
                    );
                    true
                }
                Ok(Err(e)) => {
                    error!(year, error = %e, "Year rollup failed");
                    false
                }
                Err(e) => {
                    error!(year, error = %e, "Year worker panicked");
                    false
                }
            }
        });

        tasks.push(task);
    }

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for task in tasks {
        match task.await {
            Ok(true) => succeeded += 1,
            _ => failed += 1,
        }
    }

    info!(succeeded, failed, "Backfill complete");
    Ok(())
}
