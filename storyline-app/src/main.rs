use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storyline_app::{AppState, create_app, fetch_stories};
use storyline_common::observability::{LogConfig, init_logging};
use storyline_config::{StorylineConfig, StorylineConfigLoader};
use storyline_web::{HttpFetcher, SiteProfile, StoryExtractor};

const DEFAULT_CONFIG_FILE: &str = "storyline.yaml";

/// Serve the latest homepage stories as JSON.
#[derive(Debug, Parser)]
#[command(name = "storyline", version, about)]
struct Args {
    /// YAML config file (defaults to ./storyline.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides the config file
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Fetch and extract once, print the stories, and exit
    #[arg(long)]
    once: bool,
}

fn load_config(args: &Args) -> Result<StorylineConfig> {
    let loader = match &args.config {
        Some(path) => StorylineConfigLoader::new().with_file(path),
        None => StorylineConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load().context("failed to load configuration")?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    Ok(cfg)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (CLI port > env > file > defaults)
    let cfg = load_config(&args)?;

    // 2) Logging from the loaded config
    let log_path = init_logging(LogConfig {
        app_name: "storyline",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::debug!(path = %log_path.display(), "logging initialised");

    // 3) Pipeline
    let site = SiteProfile::new(&cfg.site.base_url)?;
    let fetcher = HttpFetcher::new(
        &site,
        &cfg.site.user_agent,
        Duration::from_secs(cfg.site.timeout_secs),
    )?;
    let extractor = StoryExtractor::new(&site)?;
    let state = AppState::new(Arc::new(fetcher), extractor);

    if args.once {
        let (_, stories) = fetch_stories(&state).await?;
        println!("{}", serde_json::to_string_pretty(&stories)?);
        return Ok(());
    }

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, site = %site.base_url(), "storyline listening");
    tracing::info!("stories endpoint: http://{addr}/getTimeStories");
    tracing::info!("debug endpoint: http://{addr}/debug");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
