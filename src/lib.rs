//! # Flood Watch
//!
//! Flood-risk dashboard client. Polls a flood-risk API for the latest sensor
//! reading, 24h/48h risk predictions and recent history, and renders them
//! into a headless dashboard page with a forecast chart and a dark-mode flag.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client and wire types
//! - [`dashboard`]: Page model, renderer, charts and theme
//! - [`poller`]: Fixed-interval poll loop with per-endpoint in-flight guards
//! - [`local_store`]: Persistent key-value store for the theme flag
//! - [`display`]: Plain-text view for the terminal
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use floodwatch::api::{ClientConfig, FloodApiClient};
//! use floodwatch::dashboard::{Dashboard, DashboardOptions};
//! use floodwatch::local_store::FileStore;
//! use floodwatch::poller::{PollConfig, Poller};
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open("local_storage.json");
//!     let dashboard = Dashboard::init(&store, DashboardOptions::default());
//!
//!     let client = FloodApiClient::new(ClientConfig::default())?;
//!     let poller = Arc::new(Poller::new(
//!         Arc::new(client),
//!         Arc::new(RwLock::new(dashboard)),
//!         PollConfig::default(),
//!     ));
//!
//!     let report = poller.run_cycle(true).await;
//!     let dashboard = poller.dashboard();
//!     println!("{}", floodwatch::display::render_text(&*dashboard.read().await));
//!     println!("Any failures: {}", report.any_failed());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod local_store;
pub mod poller;

// Re-export top-level types for convenience
pub use api::{
    DashboardApi, Endpoint, FetchError, FloodApiClient, HistoryEntry, PredictionResult,
    SensorReading,
};

pub use dashboard::{Dashboard, DashboardOptions, ForecastChart, HistoryChart, Page, RiskLevel};

pub use poller::{CycleReport, DashboardEvent, PollConfig, PollOutcome, Poller};

pub use local_store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub use config::{Config, ConfigError, LoggingConfig};
