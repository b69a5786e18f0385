//! Renderer
//!
//! Writes fetched values into page slots and chart datasets. Every function
//! here is a plain overwrite: nothing is diffed or merged with what was there.
//! Slots missing from the page are skipped.

use crate::api::{HistoryEntry, PredictionResult, SensorReading};

use super::chart::{ForecastChart, HistoryChart};
use super::page::{ids, Page};
use super::risk::{RiskLevel, RISK_CLASSES, UNKNOWN_RISK_LABEL};

/// Fill the four sensor slots
pub fn render_sensor_reading(page: &mut Page, reading: &SensorReading) {
    let soil_moisture = format_number(reading.soil_moisture);
    set_text(page, ids::SOIL_MOISTURE, format!("{}m", soil_moisture));
    set_text(page, ids::RAIN, format!("{}mm", format_number(reading.rain)));
    set_text(page, ids::TEMPERATURE, format!("{}°C", format_number(reading.temperature)));
    set_text(page, ids::HUMIDITY, format!("{}%", format_number(reading.relative_humidity)));
}

/// Fill both forecast slots and, if there is one, the forecast chart
pub fn render_prediction(
    page: &mut Page,
    chart: Option<&mut ForecastChart>,
    prediction: &PredictionResult,
) {
    update_forecast(page, ids::FORECAST_24, prediction.prediction_24);
    update_forecast(page, ids::FORECAST_48, prediction.prediction_48);

    if let Some(chart) = chart {
        update_chart_data(chart, prediction);
    }
}

/// Show one risk index in a forecast slot
///
/// The slot ends up with exactly one risk class for a known index and none
/// for an unknown one.
pub fn update_forecast(page: &mut Page, slot: &str, risk_index: i64) {
    let Some(element) = page.element_mut(slot) else {
        return;
    };

    for class in RISK_CLASSES {
        element.remove_class(class);
    }

    match RiskLevel::from_index(risk_index) {
        Some(level) => {
            element.set_text(level.label());
            element.add_class(level.css_class());
        }
        None => element.set_text(UNKNOWN_RISK_LABEL),
    }
}

/// Replace the forecast chart's bars and redraw
pub fn update_chart_data(chart: &mut ForecastChart, prediction: &PredictionResult) {
    chart.set_data(vec![
        prediction.prediction_24 as f64,
        prediction.prediction_48 as f64,
    ]);
    chart.update();
}

/// Build a fresh history chart
pub fn render_history(history: &[HistoryEntry]) -> HistoryChart {
    HistoryChart::from_entries(history)
}

/// Show the error banner with `message`
pub fn show_error_message(page: &mut Page, message: &str) {
    if let Some(banner) = page.element_mut(ids::ERROR_MESSAGE) {
        banner.set_text(message);
        banner.set_visible(true);
    }
}

/// Hide the error banner (its text is left as is)
pub fn hide_error_message(page: &mut Page) {
    if let Some(banner) = page.element_mut(ids::ERROR_MESSAGE) {
        banner.set_visible(false);
    }
}

/// Show or hide the loader
pub fn show_loader(page: &mut Page, show: bool) {
    if let Some(loader) = page.element_mut(ids::LOADER) {
        loader.set_visible(show);
    }
}

/// Shortest decimal form, switching to exponent notation outside
/// `1e-6..1e21` the way JSON producers print numbers
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponent = format!("{:e}", value);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => {
            format!("{}e+{}", mantissa, power)
        }
        _ => exponent,
    }
}

fn set_text(page: &mut Page, slot: &str, text: String) {
    if let Some(element) = page.element_mut(slot) {
        element.set_text(text);
    }
}
