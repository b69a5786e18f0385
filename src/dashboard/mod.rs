//! Dashboard
//!
//! The display side of Flood Watch: a page of named slots, a forecast chart
//! handle, a history chart, and the theme flag.
//!
//! ## Architecture
//!
//! - **Page**: headless document (slot text, classes, visibility)
//! - **Renderer**: overwrites slots and chart data from API payloads
//! - **Theme**: dark-mode class + persisted flag + chart grid colors
//! - **Dashboard**: the handle that owns all of the above
//!
//! There is no global chart: [`Dashboard::init`] creates the forecast chart
//! and every update or theme change goes through the returned handle.

mod chart;
mod page;
mod render;
mod risk;
mod theme;

pub use chart::{Dataset, ForecastChart, HistoryChart, DARK_GRID_COLOR, LIGHT_GRID_COLOR};
pub use page::{ids, Element, Page, PLACEHOLDER};
pub use render::{
    hide_error_message, render_history, render_prediction, render_sensor_reading,
    show_error_message, show_loader, update_chart_data, update_forecast,
};
pub(crate) use render::format_number;
pub use risk::{RiskLevel, RISK_CLASSES, UNKNOWN_RISK_LABEL};
pub use theme::{
    apply_saved_theme, saved_dark_mode, toggle_dark_mode, DARK_MODE_CLASS, DARK_MODE_KEY,
};

use chrono::{DateTime, Local};

use crate::api::{Endpoint, HistoryEntry, PredictionResult, SensorReading};
use crate::local_store::{KeyValueStore, StoreError};

/// Options for [`Dashboard::init`]
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Create the forecast chart widget
    pub forecast_chart: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            forecast_chart: true,
        }
    }
}

/// Handle to the whole dashboard
#[derive(Debug, Clone)]
pub struct Dashboard {
    page: Page,
    forecast_chart: Option<ForecastChart>,
    history_chart: Option<HistoryChart>,
    last_reading: Option<SensorReading>,
    last_prediction: Option<PredictionResult>,
    last_refreshed: Option<DateTime<Local>>,
    pending_fetches: usize,
}

impl Dashboard {
    /// Build the page, restore the saved theme and create the forecast chart
    pub fn init(store: &dyn KeyValueStore, options: DashboardOptions) -> Self {
        let mut page = Page::dashboard_layout();
        let dark = apply_saved_theme(&mut page, store);
        tracing::debug!(dark_mode = dark, "Restored theme");

        Self {
            page,
            forecast_chart: options.forecast_chart.then(ForecastChart::new),
            history_chart: None,
            last_reading: None,
            last_prediction: None,
            last_refreshed: None,
            pending_fetches: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn forecast_chart(&self) -> Option<&ForecastChart> {
        self.forecast_chart.as_ref()
    }

    pub fn history_chart(&self) -> Option<&HistoryChart> {
        self.history_chart.as_ref()
    }

    /// Last successfully fetched sensor reading
    pub fn last_reading(&self) -> Option<&SensorReading> {
        self.last_reading.as_ref()
    }

    /// Last successfully fetched prediction
    pub fn last_prediction(&self) -> Option<&PredictionResult> {
        self.last_prediction.as_ref()
    }

    /// When any endpoint last delivered data
    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn is_dark_mode(&self) -> bool {
        self.page.root_has_class(DARK_MODE_CLASS)
    }

    /// Text of the error banner if it is showing
    pub fn error_message(&self) -> Option<&str> {
        self.page
            .element(ids::ERROR_MESSAGE)
            .filter(|banner| banner.is_visible())
            .map(Element::text)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetches > 0
    }

    /// A request went out
    pub fn begin_fetch(&mut self) {
        self.pending_fetches += 1;
        show_loader(&mut self.page, true);
    }

    /// A request came back, successfully or not
    pub fn end_fetch(&mut self) {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);
        if self.pending_fetches == 0 {
            show_loader(&mut self.page, false);
        }
    }

    /// Render a sensor reading and clear the banner
    pub fn apply_sensor_reading(&mut self, reading: SensorReading) {
        render_sensor_reading(&mut self.page, &reading);
        hide_error_message(&mut self.page);
        self.last_reading = Some(reading);
        self.last_refreshed = Some(Local::now());
    }

    /// Render a prediction (slots + chart) and clear the banner
    pub fn apply_prediction(&mut self, prediction: PredictionResult) {
        render_prediction(&mut self.page, self.forecast_chart.as_mut(), &prediction);
        hide_error_message(&mut self.page);
        self.last_prediction = Some(prediction);
        self.last_refreshed = Some(Local::now());
    }

    /// Replace the history chart
    pub fn apply_history(&mut self, history: &[HistoryEntry]) {
        self.history_chart = Some(render_history(history));
        self.last_refreshed = Some(Local::now());
    }

    /// Show the banner for a failed fetch; data slots are left untouched
    ///
    /// History failures only reach the log.
    pub fn fetch_failed(&mut self, endpoint: Endpoint) {
        if let Some(message) = endpoint.failure_message() {
            show_error_message(&mut self.page, message);
        }
    }

    /// Flip dark mode and persist it
    pub fn toggle_theme(&mut self, store: &mut dyn KeyValueStore) -> Result<bool, StoreError> {
        toggle_dark_mode(&mut self.page, store, self.forecast_chart.as_mut())
    }
}
