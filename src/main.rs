//! Repomon - session-scoped GitHub repository monitor
//!
//! CLI entry point: wires the registry, fetcher, notifier, and scheduler
//! together and runs until interrupted.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{info, warn};

use repomon::cli::{Cli, Command};
use repomon::config::Config;
use repomon::domain::{RepoId, SessionId};
use repomon::github::{GithubClient, RepoFetcher};
use repomon::notify::{ChannelNotifier, Notifier};
use repomon::registry::SessionRegistry;
use repomon::scheduler::PollScheduler;

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Check { url }) => cmd_check(&config, &url).await,
        Some(Command::Run { watch }) => cmd_run(config, watch).await,
        None => cmd_run(config, Vec::new()).await,
    }
}

/// Fetch a repository once and print its summary
async fn cmd_check(config: &Config, url: &str) -> Result<()> {
    let id = RepoId::parse(url)?;
    let client = GithubClient::from_config(&config.github)?;
    let snapshot = client.fetch(&id).await?;
    println!("{}", snapshot.summary());
    Ok(())
}

/// Run the monitor daemon until ctrl-c
async fn cmd_run(config: Config, watch_urls: Vec<String>) -> Result<()> {
    let fetcher: Arc<dyn RepoFetcher> = Arc::new(GithubClient::from_config(&config.github)?);
    let (channel_notifier, mut notifications) = ChannelNotifier::new(config.notify.queue_capacity);
    let notifier: Arc<dyn Notifier> = Arc::new(channel_notifier);
    let registry = Arc::new(SessionRegistry::new(Arc::clone(&fetcher), Arc::clone(&notifier)));

    info!(
        interval_secs = config.scheduler.poll_interval_secs,
        api_base = %config.github.api_base,
        "repomon starting"
    );

    // Seed broadcast watches requested on the command line
    let broadcast = SessionId::broadcast();
    for url in &watch_urls {
        match registry.add_watch(&broadcast, url).await {
            Ok(snapshot) => info!(repo = %snapshot.full_name, "Watching repository"),
            Err(e) => warn!(%url, error = %e, "Could not watch repository"),
        }
    }

    let scheduler = PollScheduler::new(
        Arc::clone(&registry),
        Arc::clone(&fetcher),
        Arc::clone(&notifier),
        config.scheduler.clone(),
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    // Stand-in transport: drain the notification queue to stdout. A real
    // deployment replaces this task with the client-facing transport.
    let drain_task = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("[{}] {}", notification.dest, notification.text);
        }
    });

    tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;

    info!("repomon shutting down");
    scheduler_task.abort();
    drain_task.abort();
    Ok(())
}
