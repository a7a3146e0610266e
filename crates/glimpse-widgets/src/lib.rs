#![forbid(unsafe_code)]

//! The widget set: every visualization the compositor can place in a
//! slot.
//!
//! Widget variants are closed at build time: [`BuiltWidget`] is a
//! tagged enum over the fixed set, dispatched by match. Adding a
//! visualization means adding a variant here, not subclassing an open
//! hierarchy.
//!
//! Every widget obeys the same contract:
//! - `measure` is advisory, used for auto-fit content;
//! - `render` draws only within its slot and never panics on missing
//!   data - it draws a placeholder and reports the missing identifier;
//! - `dependencies` names the data identifiers whose changes should
//!   re-render the screen.

pub mod camera;
pub mod chart;
pub mod clock;
pub mod entity;
pub mod gauge;
mod helpers;
pub mod media;
pub mod progress;
pub mod status;
pub mod text;
pub mod weather;

use std::collections::BTreeSet;

use glimpse_core::config::{WidgetConfig, WidgetKind};
use glimpse_core::data::{DataSource, EntityId};
use glimpse_layout::Slot;
use glimpse_render::RenderContext;

pub use camera::CameraWidget;
pub use chart::ChartWidget;
pub use clock::ClockWidget;
pub use entity::EntityWidget;
pub use gauge::GaugeWidget;
pub use media::MediaWidget;
pub use progress::{MultiProgressWidget, ProgressWidget};
pub use status::{StatusListWidget, StatusWidget};
pub use text::TextWidget;
pub use weather::WeatherWidget;

/// What a render call reports back: the data identifiers it needed
/// but could not resolve. Missing data is an expected state, never a
/// failure of the cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub missing: BTreeSet<EntityId>,
}

impl RenderReport {
    /// Nothing missing.
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    /// A single missing identifier.
    #[must_use]
    pub fn missed(id: EntityId) -> Self {
        let mut missing = BTreeSet::new();
        missing.insert(id);
        Self { missing }
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: RenderReport) {
        self.missing.extend(other.missing);
    }
}

/// A widget built from its configuration, ready to render.
#[derive(Debug, Clone)]
pub enum BuiltWidget {
    Clock(ClockWidget),
    Entity(EntityWidget),
    Gauge(GaugeWidget),
    Progress(ProgressWidget),
    MultiProgress(MultiProgressWidget),
    Weather(WeatherWidget),
    Status(StatusWidget),
    StatusList(StatusListWidget),
    Chart(ChartWidget),
    Media(MediaWidget),
    Camera(CameraWidget),
    Text(TextWidget),
}

impl BuiltWidget {
    /// Build the widget for a configuration entry.
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        match config.kind {
            WidgetKind::Clock => Self::Clock(ClockWidget::new(config)),
            WidgetKind::Entity => Self::Entity(EntityWidget::new(config)),
            WidgetKind::Gauge => Self::Gauge(GaugeWidget::new(config)),
            WidgetKind::Progress => Self::Progress(ProgressWidget::new(config)),
            WidgetKind::MultiProgress => Self::MultiProgress(MultiProgressWidget::new(config)),
            WidgetKind::Weather => Self::Weather(WeatherWidget::new(config)),
            WidgetKind::Status => Self::Status(StatusWidget::new(config)),
            WidgetKind::StatusList => Self::StatusList(StatusListWidget::new(config)),
            WidgetKind::Chart => Self::Chart(ChartWidget::new(config)),
            WidgetKind::Media => Self::Media(MediaWidget::new(config)),
            WidgetKind::Camera => Self::Camera(CameraWidget::new(config)),
            WidgetKind::Text => Self::Text(TextWidget::new(config)),
        }
    }

    /// The widget's type tag.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::Clock(_) => WidgetKind::Clock,
            Self::Entity(_) => WidgetKind::Entity,
            Self::Gauge(_) => WidgetKind::Gauge,
            Self::Progress(_) => WidgetKind::Progress,
            Self::MultiProgress(_) => WidgetKind::MultiProgress,
            Self::Weather(_) => WidgetKind::Weather,
            Self::Status(_) => WidgetKind::Status,
            Self::StatusList(_) => WidgetKind::StatusList,
            Self::Chart(_) => WidgetKind::Chart,
            Self::Media(_) => WidgetKind::Media,
            Self::Camera(_) => WidgetKind::Camera,
            Self::Text(_) => WidgetKind::Text,
        }
    }

    /// Data identifiers whose changes affect this widget.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        match self {
            Self::Clock(w) => w.dependencies(),
            Self::Entity(w) => w.dependencies(),
            Self::Gauge(w) => w.dependencies(),
            Self::Progress(w) => w.dependencies(),
            Self::MultiProgress(w) => w.dependencies(),
            Self::Weather(w) => w.dependencies(),
            Self::Status(w) => w.dependencies(),
            Self::StatusList(w) => w.dependencies(),
            Self::Chart(w) => w.dependencies(),
            Self::Media(w) => w.dependencies(),
            Self::Camera(w) => w.dependencies(),
            Self::Text(w) => w.dependencies(),
        }
    }

    /// Advisory preferred size within the given bounds.
    pub fn measure(
        &self,
        ctx: &mut RenderContext<'_>,
        max_width: u32,
        max_height: u32,
    ) -> (u32, u32) {
        match self {
            Self::Clock(w) => w.measure(ctx, max_width, max_height),
            Self::Text(w) => w.measure(ctx, max_width, max_height),
            // Card-style widgets want their whole slot.
            _ => (max_width, max_height),
        }
    }

    /// Render into the slot, resolving data through `data`.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        match self {
            Self::Clock(w) => w.render(ctx, slot),
            Self::Entity(w) => w.render(ctx, slot, data),
            Self::Gauge(w) => w.render(ctx, slot, data),
            Self::Progress(w) => w.render(ctx, slot, data),
            Self::MultiProgress(w) => w.render(ctx, slot, data),
            Self::Weather(w) => w.render(ctx, slot, data),
            Self::Status(w) => w.render(ctx, slot, data),
            Self::StatusList(w) => w.render(ctx, slot, data),
            Self::Chart(w) => w.render(ctx, slot, data),
            Self::Media(w) => w.render(ctx, slot, data),
            Self::Camera(w) => w.render(ctx, slot, data),
            Self::Text(w) => w.render(ctx, slot, data),
        }
    }
}
