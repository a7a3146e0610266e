#![forbid(unsafe_code)]

//! Status widgets: a binary indicator, and a titled list of them.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, ListItem, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId};
use glimpse_core::{Rect, Rgb};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

const DEFAULT_ON_COLOR: Rgb = Rgb::new(102, 166, 30);
const DEFAULT_OFF_COLOR: Rgb = Rgb::new(255, 107, 107);

/// Resolve a value to an on/off state.
fn binary_state(value: &DataValue) -> bool {
    match value {
        DataValue::Binary(b) => *b,
        DataValue::Text(s) => helpers::is_on_state(s),
        DataValue::Number { value, .. } => *value != 0.0,
        _ => false,
    }
}

/// One binary state with a colored dot.
#[derive(Debug, Clone)]
pub struct StatusWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    icon: Option<String>,
    on_color: Rgb,
    off_color: Rgb,
    on_text: String,
    off_text: String,
    show_status_text: bool,
}

impl StatusWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            icon: config.icon.clone(),
            on_color: config.options.on_color.unwrap_or(DEFAULT_ON_COLOR),
            off_color: config.options.off_color.unwrap_or(DEFAULT_OFF_COLOR),
            on_text: config.options.on_text.clone().unwrap_or_else(|| "ON".into()),
            off_text: config.options.off_text.clone().unwrap_or_else(|| "OFF".into()),
            show_status_text: config.options.show_status_text.unwrap_or(true),
        }
    }

    /// The bound identifier, when configured.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        self.entity.iter().cloned().collect()
    }

    /// Render into the slot.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        let inner = helpers::panel_inner(ctx, slot.rect);

        let (state, report) = match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => (Some(binary_state(&value)), RenderReport::ok()),
            Some((entity, None)) => (None, RenderReport::missed(entity.clone())),
            None => (None, RenderReport::ok()),
        };

        let (color, status_text) = match state {
            Some(true) => (self.on_color, self.on_text.as_str()),
            Some(false) => (self.off_color, self.off_text.as_str()),
            None => (ctx.theme().text_secondary, helpers::PLACEHOLDER),
        };

        let center_y = inner.center_y();
        let dot_radius = ((inner.height as u32 * 12 / 100) as u16).max(3);
        let icon_size = ((inner.height as u32 * 35 / 100) as u16).max(10);

        // Indicator on the left: icon when configured, dot otherwise.
        let mut cursor_x = inner.x;
        if let Some(icon) = &self.icon {
            ctx.draw_icon(
                icon,
                (inner.x, center_y.saturating_sub(icon_size / 2)),
                icon_size,
                color,
            );
            cursor_x = inner.x + icon_size + 6;
        } else {
            ctx.draw_ellipse(
                Rect::new(
                    inner.x,
                    center_y.saturating_sub(dot_radius),
                    dot_radius * 2,
                    dot_radius * 2,
                ),
                Some(color),
                None,
                1,
            );
            cursor_x = cursor_x + dot_radius * 2 + 6;
        }

        if let Some(label) = &self.label {
            ctx.draw_text(
                &label.to_uppercase(),
                (cursor_x, center_y.saturating_sub(inner.height / 8)),
                FontTier::Small,
                false,
                ctx.theme().text_secondary,
                Anchor::MID_LEFT,
            );
        }
        if self.show_status_text {
            let y = if self.label.is_some() {
                center_y + inner.height / 8
            } else {
                center_y
            };
            ctx.draw_text(
                status_text,
                (cursor_x, y),
                FontTier::Small,
                ctx.theme().value_bold,
                ctx.theme().text_primary,
                Anchor::MID_LEFT,
            );
        }
        report
    }
}

/// A titled column of binary indicators.
#[derive(Debug, Clone)]
pub struct StatusListWidget {
    items: Vec<ListItem>,
    title: Option<String>,
    on_color: Rgb,
    off_color: Rgb,
}

impl StatusListWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        let mut items = config.options.items.clone().unwrap_or_default();
        if items.is_empty()
            && let Some(entity) = &config.entity
        {
            items.push(ListItem {
                entity: entity.clone(),
                label: config.label.clone(),
            });
        }
        Self {
            items,
            title: config.options.title.clone(),
            on_color: config.options.on_color.unwrap_or(DEFAULT_ON_COLOR),
            off_color: config.options.off_color.unwrap_or(DEFAULT_OFF_COLOR),
        }
    }

    /// Every row's identifier.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        self.items.iter().map(|i| i.entity.clone()).collect()
    }

    /// Render into the slot.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        let inner = helpers::panel_inner(ctx, slot.rect);
        let mut report = RenderReport::ok();

        let title_height = match &self.title {
            Some(title) => helpers::draw_top_label(ctx, inner, title),
            None => 0,
        };
        if self.items.is_empty() {
            helpers::draw_placeholder(ctx, inner);
            return report;
        }

        let body = Rect::new(
            inner.x,
            inner.y + title_height,
            inner.width,
            inner.height.saturating_sub(title_height),
        );
        let row_height = (body.height / self.items.len().min(8) as u16).max(10);

        for (i, item) in self.items.iter().take(8).enumerate() {
            let row_y = body.y + i as u16 * row_height;
            if row_y + row_height > body.bottom() {
                break;
            }
            let center_y = row_y + row_height / 2;

            let state = match data.resolve(&item.entity) {
                Some(value) => Some(binary_state(&value)),
                None => {
                    report.merge(RenderReport::missed(item.entity.clone()));
                    None
                }
            };
            let color = match state {
                Some(true) => self.on_color,
                Some(false) => self.off_color,
                None => ctx.theme().text_secondary,
            };

            let dot = (row_height / 5).max(2);
            ctx.draw_ellipse(
                Rect::new(body.x, center_y.saturating_sub(dot), dot * 2, dot * 2),
                Some(color),
                None,
                1,
            );
            let label = item
                .label
                .clone()
                .unwrap_or_else(|| item.entity.as_str().to_string());
            ctx.draw_text(
                &label,
                (body.x + dot * 2 + 6, center_y),
                FontTier::Small,
                false,
                ctx.theme().text_primary,
                Anchor::MID_LEFT,
            );
        }
        report
    }
}
