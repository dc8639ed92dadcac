use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use lexfeed::api::{ApiClient, FeedKind};
use lexfeed::app::{App, AppEvent};
use lexfeed::config::{Config, API_URL_ENV};
use lexfeed::ui;

/// Get the config directory path (~/.config/lexfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("lexfeed"))
}

#[derive(Parser, Debug)]
#[command(
    name = "lexfeed",
    about = "Browse the Legal Insights blog and community forum from the terminal"
)]
struct Args {
    /// Backend base URL (overrides LEXFEED_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// View to open at startup: "blogs" or "community"
    #[arg(long, value_name = "VIEW", value_parser = parse_view)]
    view: Option<FeedKind>,

    /// Config file (default: ~/.config/lexfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn parse_view(s: &str) -> Result<FeedKind, String> {
    FeedKind::from_str_name(s).ok_or_else(|| format!("unknown view '{}', expected blogs or community", s))
}

/// Initialize tracing. Logs go to `log_file` when given, since stderr is
/// hidden behind the alternate screen while the TUI runs.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    let env_url = std::env::var(API_URL_ENV).ok();
    let api_url = config.resolve_api_url(args.api_url.as_deref(), env_url.as_deref());
    let api = ApiClient::new(&api_url, config.request_timeout())
        .with_context(|| format!("Invalid API URL: {}", api_url))?;
    tracing::info!(base_url = %api.base_url(), "Using backend");

    let kind = args.view.unwrap_or_else(|| config.start_view());
    let mut app = App::new(api, kind);
    app.set_theme(config.theme_variant());

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("Keybinding config: {}", warning);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
