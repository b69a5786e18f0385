//! Chart Models
//!
//! Data-only chart widgets. The forecast chart is a long-lived handle owned by
//! the dashboard and mutated in place; the history chart is rebuilt from
//! scratch on every history fetch.

use crate::api::HistoryEntry;

use super::risk::RiskLevel;

/// Grid line color in dark mode
pub const DARK_GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";
/// Grid line color in light mode
pub const LIGHT_GRID_COLOR: &str = "rgba(0, 0, 0, 0.1)";

/// One series of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Vec<String>,
    pub background_color: Vec<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            border_color: Vec::new(),
            background_color: Vec::new(),
        }
    }

    /// Same border/background color for every point
    pub fn colored(mut self, border: &str, background: &str) -> Self {
        self.border_color = vec![border.to_string()];
        self.background_color = vec![background.to_string()];
        self
    }
}

/// Bar chart of the 24h and 48h risk levels
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    labels: Vec<String>,
    dataset: Dataset,
    /// `None` means the chart library default
    x_grid_color: Option<String>,
    y_grid_color: Option<String>,
    revision: u64,
}

impl ForecastChart {
    /// Highest value on the y axis
    pub const Y_MAX: f64 = 2.0;

    pub fn new() -> Self {
        let dataset = Dataset {
            label: "Flood Risk Level".to_string(),
            data: vec![0.0, 0.0],
            border_color: vec![
                "rgba(75, 192, 192, 1)".to_string(),
                "rgba(153, 102, 255, 1)".to_string(),
            ],
            background_color: vec![
                "rgba(75, 192, 192, 0.5)".to_string(),
                "rgba(153, 102, 255, 0.5)".to_string(),
            ],
        };

        Self {
            labels: vec!["Day 1".to_string(), "Day 2".to_string()],
            dataset,
            x_grid_color: None,
            y_grid_color: None,
            revision: 0,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Current bar values
    pub fn data(&self) -> &[f64] {
        &self.dataset.data
    }

    /// Replace the dataset's values (takes effect on the next `update`)
    pub fn set_data(&mut self, data: Vec<f64>) {
        self.dataset.data = data;
    }

    pub fn grid_colors(&self) -> (Option<&str>, Option<&str>) {
        (self.x_grid_color.as_deref(), self.y_grid_color.as_deref())
    }

    /// Set both axes' grid line color
    pub fn set_grid_color(&mut self, color: &str) {
        self.x_grid_color = Some(color.to_string());
        self.y_grid_color = Some(color.to_string());
    }

    /// Redraw
    pub fn update(&mut self) {
        self.revision += 1;
    }

    /// Number of redraws so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Y axis tick text
    pub fn tick_label(value: f64) -> &'static str {
        risk_at(value).map(|level| level.short_name()).unwrap_or("")
    }

    /// Tooltip text for a bar
    pub fn tooltip_label(value: f64) -> String {
        let risk_text = match risk_at(value) {
            Some(RiskLevel::Low) => "Low Risk",
            Some(RiskLevel::Medium) => "Medium Risk",
            Some(RiskLevel::High) => "High Risk",
            None => "Unknown",
        };
        format!("Risk Level: {} ({})", risk_text, value)
    }
}

impl Default for ForecastChart {
    fn default() -> Self {
        Self::new()
    }
}

fn risk_at(value: f64) -> Option<RiskLevel> {
    if value.fract() != 0.0 {
        return None;
    }
    RiskLevel::from_index(value as i64)
}

/// Line chart of rainfall and temperature over time
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryChart {
    pub labels: Vec<String>,
    pub rainfall: Dataset,
    pub temperature: Dataset,
}

impl HistoryChart {
    /// Build a chart from history rows, in the order given
    pub fn from_entries(history: &[HistoryEntry]) -> Self {
        let labels = history.iter().map(|e| e.timestamp.clone()).collect();
        let rain = history.iter().map(|e| e.rain).collect();
        let temperature = history.iter().map(|e| e.temperature).collect();

        Self {
            labels,
            rainfall: Dataset::new("Rainfall (mm)", rain)
                .colored("rgba(75, 192, 192, 1)", "rgba(75, 192, 192, 0.2)"),
            temperature: Dataset::new("Temperature (°C)", temperature)
                .colored("rgba(255, 99, 132, 1)", "rgba(255, 99, 132, 0.2)"),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
