use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use jobfeed::config::Config;
use jobfeed::feed::HttpFetcher;
use jobfeed::jobs::{Aggregator, EntryLevelClassifier};
use jobfeed::server::{self, AppState};

/// Default config path (~/.config/jobfeed/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("jobfeed")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "jobfeed", about = "Remote job search over public RSS feeds")]
struct Args {
    /// Config file (defaults to ~/.config/jobfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overrides `bind` from the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Print the configured feed sources and exit
    #[arg(long)]
    list_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let registry = config.registry().context("Invalid feed sources")?;

    if args.list_sources {
        for source in &registry {
            println!("{:<16} {}", source.id, source.url);
        }
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;
    let fetcher = HttpFetcher::new(client)
        .with_timeout(config.fetch_timeout())
        .with_max_size(config.max_feed_size_bytes);
    let classifier =
        EntryLevelClassifier::standard().context("Failed to compile entry-level rules")?;

    tracing::info!(sources = registry.len(), "Feed registry ready");

    let aggregator = Aggregator::new(Arc::new(registry), Arc::new(fetcher), classifier)
        .with_max_concurrent(config.max_concurrent_fetches);

    let addr = args.bind.unwrap_or(config.bind);
    server::serve(addr, AppState::new(aggregator))
        .await
        .with_context(|| format!("Server error on {addr}"))?;

    Ok(())
}
