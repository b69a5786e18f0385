//! Dark Mode
//!
//! The theme is one class on the page root plus one persisted flag.
//! Only the exact string `"true"` counts as dark; a missing key, `"false"`
//! or anything else is light.

use crate::local_store::{KeyValueStore, StoreError};

use super::chart::{ForecastChart, DARK_GRID_COLOR, LIGHT_GRID_COLOR};
use super::page::Page;

/// Store key of the flag
pub const DARK_MODE_KEY: &str = "darkMode";
/// Root class applied in dark mode
pub const DARK_MODE_CLASS: &str = "dark-mode";

/// Whether the store says dark mode
pub fn saved_dark_mode(store: &dyn KeyValueStore) -> bool {
    store.get_item(DARK_MODE_KEY).as_deref() == Some("true")
}

/// Apply the stored theme to a fresh page, returning whether it is dark
///
/// Chart grid colors are left at their defaults.
pub fn apply_saved_theme(page: &mut Page, store: &dyn KeyValueStore) -> bool {
    let dark = saved_dark_mode(store);
    if dark {
        page.add_root_class(DARK_MODE_CLASS);
    }
    dark
}

/// Flip the theme, persist it, and recolor the forecast chart grid
///
/// Returns the new state. The page is flipped even if persisting fails.
pub fn toggle_dark_mode(
    page: &mut Page,
    store: &mut dyn KeyValueStore,
    chart: Option<&mut ForecastChart>,
) -> Result<bool, StoreError> {
    let dark = page.toggle_root_class(DARK_MODE_CLASS);

    if let Some(chart) = chart {
        chart.set_grid_color(if dark { DARK_GRID_COLOR } else { LIGHT_GRID_COLOR });
        chart.update();
    }

    store.set_item(DARK_MODE_KEY, if dark { "true" } else { "false" })?;

    tracing::info!(dark_mode = dark, "Theme toggled");
    Ok(dark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;

    #[test]
    fn test_absent_flag_is_light() {
        let store = MemoryStore::new();
        let mut page = Page::dashboard_layout();
        assert!(!apply_saved_theme(&mut page, &store));
        assert!(!page.root_has_class(DARK_MODE_CLASS));
    }

    #[test]
    fn test_only_exact_true_is_dark() {
        for (value, dark) in [
            ("true", true),
            ("false", false),
            ("TRUE", false),
            ("1", false),
            ("", false),
        ] {
            let mut store = MemoryStore::new();
            store.set_item(DARK_MODE_KEY, value).unwrap();
            let mut page = Page::new();
            assert_eq!(apply_saved_theme(&mut page, &store), dark, "value {:?}", value);
            assert_eq!(page.root_has_class(DARK_MODE_CLASS), dark);
        }
    }

    #[test]
    fn test_startup_leaves_grid_colors() {
        let mut store = MemoryStore::new();
        store.set_item(DARK_MODE_KEY, "true").unwrap();
        let mut page = Page::new();
        let chart = ForecastChart::new();

        apply_saved_theme(&mut page, &store);
        assert_eq!(chart.grid_colors(), (None, None));
    }

    #[test]
    fn test_toggle_recolors_chart() {
        let mut store = MemoryStore::new();
        let mut page = Page::dashboard_layout();
        let mut chart = ForecastChart::new();

        let dark = toggle_dark_mode(&mut page, &mut store, Some(&mut chart)).unwrap();
        assert!(dark);
        assert_eq!(chart.grid_colors(), (Some(DARK_GRID_COLOR), Some(DARK_GRID_COLOR)));
        assert_eq!(chart.revision(), 1);
        assert_eq!(store.get_item(DARK_MODE_KEY).as_deref(), Some("true"));

        let dark = toggle_dark_mode(&mut page, &mut store, Some(&mut chart)).unwrap();
        assert!(!dark);
        assert_eq!(chart.grid_colors(), (Some(LIGHT_GRID_COLOR), Some(LIGHT_GRID_COLOR)));
        assert_eq!(store.get_item(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        for start in ["true", "false"] {
            let mut store = MemoryStore::new();
            store.set_item(DARK_MODE_KEY, start).unwrap();
            let mut page = Page::dashboard_layout();
            apply_saved_theme(&mut page, &store);
            let before = page.clone();

            toggle_dark_mode(&mut page, &mut store, None).unwrap();
            toggle_dark_mode(&mut page, &mut store, None).unwrap();

            assert_eq!(page, before);
            assert_eq!(store.get_item(DARK_MODE_KEY).as_deref(), Some(start));
        }
    }
}
