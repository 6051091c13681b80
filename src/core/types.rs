use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Measured size of the surface a chart renders into, in CSS-like pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Bound satisfied by every identifier usable as an element key.
///
/// Keys are opaque: controllers only compare and hash them, and format them
/// with `Debug` in diagnostics.
pub trait ItemKey: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T> ItemKey for T where T: Clone + Eq + Hash + fmt::Debug + 'static {}

/// One datum bound to exactly one visual element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<K> {
    pub id: K,
    /// Category label for bars, display name for map countries.
    #[serde(default)]
    pub label: String,
    pub value: f64,
    pub color: Color,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub border_color: Option<Color>,
    #[serde(default)]
    pub selected: bool,
}

impl<K> Item<K> {
    #[must_use]
    pub fn new(id: K, value: f64, color: Color) -> Self {
        Self {
            id,
            label: String::new(),
            value,
            color,
            opacity: None,
            border_color: None,
            selected: false,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Geocoded record rendered as a bubble on the map chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCountry<K> {
    #[serde(flatten)]
    pub item: Item<K>,
    pub latitude: f64,
    pub longitude: f64,
}

impl<K> MapCountry<K> {
    #[must_use]
    pub fn new(item: Item<K>, latitude: f64, longitude: f64) -> Self {
        Self {
            item,
            latitude,
            longitude,
        }
    }
}

/// Anything a [`crate::core::Dataset`] can hold.
pub trait Record {
    type Key: ItemKey;

    fn item(&self) -> &Item<Self::Key>;

    fn key(&self) -> &Self::Key {
        &self.item().id
    }
}

impl<K: ItemKey> Record for Item<K> {
    type Key = K;

    fn item(&self) -> &Item<K> {
        self
    }
}

impl<K: ItemKey> Record for MapCountry<K> {
    type Key = K;

    fn item(&self) -> &Item<K> {
        &self.item
    }
}

/// Named group of bars rendered side by side inside each category band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries<K> {
    pub name: String,
    pub bars: Vec<Item<K>>,
}

impl<K> BarSeries<K> {
    #[must_use]
    pub fn new(name: impl Into<String>, bars: Vec<Item<K>>) -> Self {
        Self {
            name: name.into(),
            bars,
        }
    }
}
