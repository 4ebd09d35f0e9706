//! careerwatch CLI
//!
//! Runs crawl cycles against the configured career pages, either once or
//! on a fixed interval.

use std::path::PathBuf;
use std::sync::Arc;

use careerwatch::{
    config,
    error::Result,
    models::Config,
    pipeline::{Orchestrator, SnapshotHandle, Watcher},
    services::{LogNotifier, is_relevant, notify_postings},
    storage::{FingerprintStore, LocalStorage},
    utils::http::HttpFetcher,
};
use clap::{Parser, Subcommand};

/// careerwatch - Career Page Internship Watcher
#[derive(Parser, Debug)]
#[command(
    name = "careerwatch",
    version,
    about = "Watches career pages for new backend internship postings"
)]

struct Cli {
    /// Path to storage directory containing config and seen-set files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single crawl cycle
    Run,

    /// Run a cycle now and then every configured interval
    Watch {
        /// Override the interval between cycles, in hours
        #[arg(long)]
        interval_hours: Option<u64>,
    },

    /// Validate configuration files
    Validate,

    /// Show storage and seen-set info
    Info,

    /// Show whether a title would be reported
    Check {
        /// Posting title to classify
        title: String,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn build_orchestrator(cli: &Cli, config: &Config) -> Result<Orchestrator> {
    let seen_path = config::seen_path(&cli.storage_dir, config);
    let store = FingerprintStore::load(LocalStorage::new(&seen_path)).await;
    let fetcher = HttpFetcher::new(&config.crawler)?;
    Ok(Orchestrator::new(
        Arc::new(fetcher),
        store,
        config.crawler.politeness(),
    ))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("careerwatch starting...");

    match &cli.command {
        Command::Run => {
            let config = config::load_all(&cli.storage_dir)?;
            let mut orchestrator = build_orchestrator(&cli, &config).await?;
            let notifier = LogNotifier::new(config.notify.recipient.clone());

            let result = orchestrator.run_cycle(&config.sources).await;
            notify_postings(&notifier, &result.novel).await;

            log::info!(
                "{} new, {} relevant, {} failed sources, {} postings recorded",
                result.novel_count(),
                result.total_seen,
                result.failed_sources.len(),
                orchestrator.store().len()
            );
        }

        Command::Watch { interval_hours } => {
            let mut config = config::load_all(&cli.storage_dir)?;
            if let Some(hours) = interval_hours {
                config.schedule.interval_hours = (*hours).max(1);
            }

            let orchestrator = build_orchestrator(&cli, &config).await?;
            let notifier = Arc::new(LogNotifier::new(config.notify.recipient.clone()));
            let interval = config.schedule.interval();

            log::info!(
                "Watching {} sources every {} hours",
                config.sources.len(),
                config.schedule.interval_hours
            );

            let watcher = Watcher::new(
                orchestrator,
                config.sources.clone(),
                notifier,
                SnapshotHandle::new(),
            );
            watcher
                .run_until(interval, async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                })
                .await;

            let snapshot = watcher.snapshot().latest();
            log::info!(
                "Stopped. {} postings found this session, last check: {}",
                snapshot.total_found,
                snapshot
                    .last_check
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            let config = match config::load_all(&cli.storage_dir) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Config validation failed: {}", e);
                    return Err(e);
                }
            };
            log::info!("✓ Config OK ({} sources)", config.sources.len());
            log::info!("    Timeout: {}s", config.crawler.timeout_secs);
            log::info!(
                "    Politeness: {}-{}ms",
                config.crawler.politeness_min_ms,
                config.crawler.politeness_max_ms
            );
            log::info!("    Interval: {}h", config.schedule.interval_hours);
        }

        Command::Info => {
            let config = Config::load_or_default(cli.storage_dir.join(config::CONFIG_FILE));
            let seen_path = config::seen_path(&cli.storage_dir, &config);
            let store = FingerprintStore::load(LocalStorage::new(&seen_path)).await;

            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Seen-set: {} ({} postings)", seen_path.display(), store.len());
            for source in &config.sources {
                log::info!(
                    "    {} [{:?}] {}",
                    source.name,
                    source.adapter,
                    source.search_url
                );
            }
        }

        Command::Check { title } => {
            let verdict = if is_relevant(title) {
                "relevant"
            } else {
                "not relevant"
            };
            println!("{title}: {verdict}");
        }
    }

    log::info!("Done!");

    Ok(())
}
