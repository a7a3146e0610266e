#![forbid(unsafe_code)]

//! The persisted configuration shape.
//!
//! `Screen` and `WidgetConfig` are the only shapes the core depends on
//! that outlive a render cycle. The host environment owns persistence;
//! the core consumes these read-only, once per cycle.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::data::EntityId;

/// One complete dashboard configuration, renderable as a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Stable identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Layout identifier (resolved by the layout engine, with fallback).
    pub layout: String,
    /// Theme identifier (resolved by the theme registry, with fallback).
    #[serde(default = "default_theme_id")]
    pub theme: String,
    /// Display brightness 0-100, when the screen wants to override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// Widget assignments. Slot indices are unique within a screen;
    /// gaps mean an empty slot.
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

fn default_theme_id() -> String {
    "classic".to_string()
}

impl Screen {
    /// A minimal screen: one clock on the default layout, like the
    /// original out-of-the-box configuration.
    pub fn with_default_widgets(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            layout: "grid_2x2".to_string(),
            theme: default_theme_id(),
            brightness: None,
            widgets: vec![WidgetConfig::new(WidgetKind::Clock, 0)],
        }
    }
}

/// The closed set of widget types.
///
/// Adding a visualization means adding a variant here and a rendering
/// arm in `glimpse-widgets`; there is no open registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Clock,
    Entity,
    Gauge,
    Progress,
    MultiProgress,
    Weather,
    Status,
    StatusList,
    Chart,
    Media,
    Camera,
    Text,
}

impl WidgetKind {
    /// The serialized tag, for logging.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Entity => "entity",
            Self::Gauge => "gauge",
            Self::Progress => "progress",
            Self::MultiProgress => "multi_progress",
            Self::Weather => "weather",
            Self::Status => "status",
            Self::StatusList => "status_list",
            Self::Chart => "chart",
            Self::Media => "media",
            Self::Camera => "camera",
            Self::Text => "text",
        }
    }
}

/// One widget assignment within a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Widget type tag.
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Slot index into the screen's layout, 0-based.
    pub slot: usize,
    /// Bound data identifier, for widgets that show live values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityId>,
    /// Label text. May contain rich-text markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Accent color override; themes pick one otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Icon name, for widgets that draw one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Per-type style options.
    #[serde(default)]
    pub options: WidgetOptions,
}

impl WidgetConfig {
    /// Create a bare config for the given kind and slot.
    pub fn new(kind: WidgetKind, slot: usize) -> Self {
        Self {
            kind,
            slot,
            entity: None,
            label: None,
            color: None,
            icon: None,
            options: WidgetOptions::default(),
        }
    }
}

/// Horizontal alignment within a slot or line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

/// Font size ladder, matching the fixed sizes the display is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontTier {
    Tiny,
    Small,
    #[default]
    Regular,
    Medium,
    Large,
    Xlarge,
    Huge,
}

impl FontTier {
    /// Nominal size in logical pixels.
    #[must_use]
    pub const fn px(self) -> u16 {
        match self {
            Self::Tiny => 9,
            Self::Small => 11,
            Self::Regular => 13,
            Self::Medium => 16,
            Self::Large => 22,
            Self::Xlarge => 32,
            Self::Huge => 48,
        }
    }
}

/// Gauge rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeStyle {
    #[default]
    Bar,
    Ring,
    Arc,
}

/// Clock time format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "24h")]
    #[default]
    H24,
    #[serde(rename = "12h")]
    H12,
}

/// How image-like content fills its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
}

/// One row of a multi-progress or status-list widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub entity: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Per-type style options, all optional so configs stay terse.
///
/// Each widget reads the fields it understands and ignores the rest,
/// mirroring how the original untyped option maps behaved while keeping
/// the schema closed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    // text
    pub text: Option<String>,
    pub size: Option<FontTier>,
    pub align: Option<Align>,

    // clock
    pub show_date: Option<bool>,
    pub show_seconds: Option<bool>,
    pub time_format: Option<TimeFormat>,

    // entity
    pub show_name: Option<bool>,
    pub show_unit: Option<bool>,
    pub show_panel: Option<bool>,

    // gauge
    pub style: Option<GaugeStyle>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<String>,
    pub show_value: Option<bool>,

    // progress
    pub target: Option<f64>,
    pub show_target: Option<bool>,

    // multi_progress / status_list
    pub items: Option<Vec<ListItem>>,
    pub title: Option<String>,

    // status
    pub on_text: Option<String>,
    pub off_text: Option<String>,
    pub on_color: Option<Rgb>,
    pub off_color: Option<Rgb>,
    pub show_status_text: Option<bool>,

    // weather
    pub show_forecast: Option<bool>,
    pub forecast_days: Option<u8>,
    pub show_humidity: Option<bool>,
    pub show_wind: Option<bool>,

    // chart
    pub show_range: Option<bool>,

    // media
    pub show_artist: Option<bool>,
    pub show_album: Option<bool>,
    pub show_progress: Option<bool>,

    // camera
    pub fit: Option<ImageFit>,
}
