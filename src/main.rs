//! Flood Watch CLI
//!
//! Terminal front end for the flood-risk dashboard:
//! - Watch the dashboard live
//! - Fetch everything once
//! - Check API health
//! - Toggle the stored theme
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use floodwatch::config::{generate_default_config, Config, LoggingConfig};
use floodwatch::dashboard::{apply_saved_theme, saved_dark_mode, toggle_dark_mode, Page};
use floodwatch::display::render_text;
use floodwatch::{Dashboard, DashboardOptions, FileStore, FloodApiClient, Poller};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "floodwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flood-risk dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the API and keep the dashboard on screen
    ///
    /// Type `t` + Enter to toggle dark mode, `r` to refresh now, `q` to quit.
    Watch,

    /// Fetch every endpoint once and print the dashboard
    Once,

    /// Check that the API is reachable
    Status,

    /// Show or toggle the stored dark-mode flag
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the stored flag
    Show,
    /// Flip the stored flag
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref(), cli.api_url)?;

    init_tracing(&config.logging);
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Watch => watch(config).await?,

        Commands::Once => {
            let store = FileStore::open(config.store.resolved_path());
            let poller = build_poller(&config, &store)?;

            let report = poller.run_cycle(true).await;
            let dashboard = poller.dashboard();
            print!("{}", render_text(&*dashboard.read().await));

            if report.any_failed() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let client = FloodApiClient::new(config.api.client_config())?;

            match client.health_check().await {
                Ok(health) => {
                    println!("Flood Watch v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API: {}", client.base_url());
                    println!("Status: {}", health.status);
                }
                Err(e) => {
                    eprintln!("Cannot reach the flood-risk API at {}", client.base_url());
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Theme { action } => {
            let mut store = FileStore::open(config.store.resolved_path());

            let dark = match action {
                ThemeAction::Show => saved_dark_mode(&store),
                ThemeAction::Toggle => {
                    let mut page = Page::dashboard_layout();
                    apply_saved_theme(&mut page, &store);
                    toggle_dark_mode(&mut page, &mut store, None)
                        .with_context(|| format!("writing {:?}", store.path()))?
                }
            };
            println!("Dark mode: {}", if dark { "on" } else { "off" });
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("floodwatch={}", logging.level).into());

    // stdout carries the dashboard; logs go to stderr
    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_poller(config: &Config, store: &FileStore) -> anyhow::Result<Arc<Poller>> {
    let client = FloodApiClient::new(config.api.client_config())
        .context("building HTTP client")?;
    tracing::info!("Using flood-risk API at {}", client.base_url());

    let dashboard = Dashboard::init(store, DashboardOptions::default());

    Ok(Arc::new(Poller::new(
        Arc::new(client),
        Arc::new(RwLock::new(dashboard)),
        config.poll.poll_config(),
    )))
}

async fn watch(config: Config) -> anyhow::Result<()> {
    let mut store = FileStore::open(config.store.resolved_path());
    let poller = build_poller(&config, &store)?;

    let mut events = poller.subscribe();
    let poll_loop = Arc::clone(&poller).start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    print_dashboard(&poller).await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => print_dashboard(&poller).await,
                Err(RecvError::Closed) => break,
            },

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(command)) => match command.trim() {
                    "t" => {
                        let result = poller.dashboard().write().await.toggle_theme(&mut store);
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "Failed to persist theme");
                        }
                        print_dashboard(&poller).await;
                    }
                    "r" => {
                        poller.poll_cycle(poller.config().refresh_history);
                    }
                    "q" => break,
                    "" => {}
                    other => {
                        eprintln!(
                            "Unknown command {:?} (t = toggle theme, r = refresh, q = quit)",
                            other
                        );
                    }
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Stopped reading commands from stdin");
                    stdin_open = false;
                }
            },

            _ = &mut ctrl_c => break,
        }
    }

    tracing::info!("Shutting down...");
    poll_loop.abort();
    Ok(())
}

async fn print_dashboard(poller: &Poller) {
    let text = {
        let dashboard = poller.dashboard();
        let dashboard = dashboard.read().await;
        render_text(&dashboard)
    };

    if std::io::stdout().is_terminal() {
        // Clear screen and home the cursor
        print!("\x1B[2J\x1B[H");
    }
    print!("{}", text);
    println!();
    println!("[t] toggle theme  [r] refresh  [q] quit");
}
