//! Terminal View
//!
//! Plain-text rendering of a [`Dashboard`] for the CLI.

use std::fmt::Write;

use crate::dashboard::{format_number, ids, Dashboard, ForecastChart, HistoryChart};

/// Render the whole dashboard as text
pub fn render_text(dashboard: &Dashboard) -> String {
    let page = dashboard.page();
    let slot = |id: &str| page.text(id).unwrap_or("").to_string();
    let mut out = String::new();

    let theme = if dashboard.is_dark_mode() { "dark" } else { "light" };
    let _ = writeln!(out, "Flood Watch  [{} mode]", theme);
    let _ = writeln!(out, "{}", "=".repeat(44));

    if let Some(message) = dashboard.error_message() {
        let _ = writeln!(out, "! {}", message);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{:<16}{}", "Soil moisture", slot(ids::SOIL_MOISTURE));
    let _ = writeln!(out, "{:<16}{}", "Rainfall", slot(ids::RAIN));
    let _ = writeln!(out, "{:<16}{}", "Temperature", slot(ids::TEMPERATURE));
    let _ = writeln!(out, "{:<16}{}", "Humidity", slot(ids::HUMIDITY));
    if let Some(pressure) = dashboard.last_reading().and_then(|r| r.surface_pressure) {
        let _ = writeln!(out, "{:<16}{}hPa", "Pressure", format_number(pressure));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<16}{}", "24h forecast", slot(ids::FORECAST_24));
    let _ = writeln!(out, "{:<16}{}", "48h forecast", slot(ids::FORECAST_48));

    if let Some(chart) = dashboard.forecast_chart() {
        let _ = writeln!(out);
        write_forecast_chart(&mut out, chart);
    }

    if let Some(history) = dashboard.history_chart() {
        let _ = writeln!(out);
        write_history(&mut out, history);
    }

    let _ = writeln!(out);
    let source_stamp = dashboard
        .last_reading()
        .and_then(|r| r.last_updated.clone())
        .or_else(|| dashboard.last_prediction().and_then(|p| p.last_updated.clone()));
    if let Some(stamp) = source_stamp {
        let _ = writeln!(out, "Data as of {}", stamp);
    }
    match dashboard.last_refreshed() {
        Some(at) => {
            let _ = writeln!(out, "Last refreshed {}", at.format("%Y-%m-%d %H:%M:%S"));
        }
        None => {
            let _ = writeln!(out, "Waiting for data...");
        }
    }
    if dashboard.is_loading() {
        let _ = writeln!(out, "Loading...");
    }

    out
}

fn write_forecast_chart(out: &mut String, chart: &ForecastChart) {
    let _ = writeln!(out, "{}", chart.dataset().label);
    for (label, &value) in chart.labels().iter().zip(chart.data()) {
        let width = (value.clamp(0.0, ForecastChart::Y_MAX) as usize + 1) * 4;
        let _ = writeln!(
            out,
            "  {:<6} {:<12} {}",
            label,
            "#".repeat(width),
            ForecastChart::tooltip_label(value)
        );
    }
}

fn write_history(out: &mut String, history: &HistoryChart) {
    let _ = writeln!(
        out,
        "History ({} entries): {} / {}",
        history.len(),
        history.rainfall.label,
        history.temperature.label
    );
    for ((timestamp, &rain), &temperature) in history
        .labels
        .iter()
        .zip(&history.rainfall.data)
        .zip(&history.temperature.data)
    {
        let _ = writeln!(
            out,
            "  {:<20} {:>8} {:>8}",
            timestamp,
            format_number(rain),
            format_number(temperature)
        );
    }
}
