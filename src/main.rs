//! kbtui - Terminal console for the KB API
//!
//! A TUI over a Kafka browser HTTP API with:
//! - Search jobs over topic contents, polled until they finish
//! - Topic configuration browsing and inline editing
//!
//! # Architecture
//!
//! - `api` - HTTP client for the KB API
//! - `search` - Search job polling controller
//! - `config_edit` - Topic configuration editor
//! - `topic_info` - Cached topic information query
//! - `app` - Application state and input handling
//! - `ui` - Terminal UI rendering with ratatui
//! - `config` - Settings file
//! - `logging` - Log file setup

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, poll, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kbtui::{logging, search::SearchField, ui::ui, App, ClusterContext, Config, KbClient};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Event loop tick in milliseconds
const TICK_MS: u64 = 50;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the KB API
    #[arg(short, long, env = "KB_API")]
    api_url: Option<String>,

    /// Cluster name from the config file, or a raw kafka id
    #[arg(short, long, env = "KB_KAFKA_ID")]
    cluster: Option<String>,

    /// Topic to prefill in the search form
    #[arg(short, long)]
    topic: Option<String>,

    /// Interval between search status polls
    #[arg(long, env = "KB_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file to write to instead of the platform default
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.log_file.clone().or_else(logging::default_log_path) {
        logging::init(&path)?;
    }

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.poll_interval_ms = ms;
    }

    let cluster_name = args
        .cluster
        .or_else(|| config.default_cluster.clone())
        .context("No cluster selected. Use -c, KB_KAFKA_ID or default_cluster in the config file")?;
    let cluster = ClusterContext::new(config.resolve_cluster(&cluster_name));

    let client = KbClient::new(
        &config.api_url,
        Duration::from_millis(config.request_timeout_ms),
    )
    .context("Failed to create KB API client")?;
    let api_url = client.base_url().to_string();

    info!(api_url = %api_url, kafka_id = %cluster.kafka_id, "starting kbtui");

    let mut app = App::new(Arc::new(client), api_url, cluster, config);
    if let Some(topic) = args.topic {
        app.search_mut().field_mut(SearchField::TopicName).push_str(&topic);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Only the recent topics are written back; CLI overrides stay out of the file
    let saved = Config::load_from(&config_path).and_then(|mut stored| {
        stored.recent_topics = app.config().recent_topics.clone();
        stored.save_to(&config_path)
    });
    if let Err(e) = saved {
        warn!(error = %e, "failed to save recent topics");
    }

    res
}

/// Drives the UI on the main thread; requests run on the tokio workers
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.clear()?;

    loop {
        app.on_tick(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        // Short poll timeout so search updates keep flowing
        if poll(Duration::from_millis(TICK_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key)? {
                    return Ok(());
                }
            }
        }
    }
}
