//! Page Model
//!
//! A headless stand-in for the dashboard's document: display slots looked up
//! by id, each with text, a class list and a visibility flag, plus the class
//! list of the document root (where the theme class lives).

use std::collections::{BTreeMap, BTreeSet};

/// Slot ids used by the dashboard layout
pub mod ids {
    pub const SOIL_MOISTURE: &str = "soil-moisture";
    pub const RAIN: &str = "rain";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const FORECAST_24: &str = "24hr-forecast";
    pub const FORECAST_48: &str = "48hr-forecast";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const LOADER: &str = "loader";
}

/// Text shown in a data slot before its first fetch
pub const PLACEHOLDER: &str = "--";

/// One display slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    text: String,
    classes: BTreeSet<String>,
    visible: bool,
}

impl Element {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classes: BTreeSet::new(),
            visible: true,
        }
    }

    /// A slot that starts hidden (banner, loader)
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::new("")
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// The whole document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    root_classes: BTreeSet<String>,
    elements: BTreeMap<String, Element>,
}

impl Page {
    /// An empty page with no slots
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard dashboard layout: four sensor slots, two forecast slots,
    /// a hidden error banner and a hidden loader
    pub fn dashboard_layout() -> Self {
        let mut page = Self::new();
        for id in [
            ids::SOIL_MOISTURE,
            ids::RAIN,
            ids::TEMPERATURE,
            ids::HUMIDITY,
            ids::FORECAST_24,
            ids::FORECAST_48,
        ] {
            page.insert(id, Element::new(PLACEHOLDER));
        }
        page.insert(ids::ERROR_MESSAGE, Element::hidden());
        page.insert(ids::LOADER, Element::hidden());
        page
    }

    /// Add or replace a slot
    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Text of a slot, if it exists
    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(Element::text)
    }

    pub fn root_has_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    pub fn add_root_class(&mut self, class: &str) {
        self.root_classes.insert(class.to_string());
    }

    /// Flip a root class, returning whether it is now present
    pub fn toggle_root_class(&mut self, class: &str) -> bool {
        if self.root_classes.remove(class) {
            false
        } else {
            self.root_classes.insert(class.to_string());
            true
        }
    }
}
