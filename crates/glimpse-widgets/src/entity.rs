#![forbid(unsafe_code)]

//! Entity widget: one bound value, shown large.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::helpers;
use crate::RenderReport;

/// Shows a data value with its unit and friendly name.
#[derive(Debug, Clone)]
pub struct EntityWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    color: Option<glimpse_core::Rgb>,
    icon: Option<String>,
    show_name: bool,
    show_unit: bool,
    show_panel: bool,
}

impl EntityWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            color: config.color,
            icon: config.icon.clone(),
            show_name: config.options.show_name.unwrap_or(true),
            show_unit: config.options.show_unit.unwrap_or(true),
            show_panel: config.options.show_panel.unwrap_or(false),
        }
    }

    /// The bound identifier, when configured.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        self.entity.iter().cloned().collect()
    }

    /// Render the value into the slot.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        let inner = if self.show_panel {
            helpers::panel_inner(ctx, slot.rect)
        } else {
            helpers::padded(ctx, slot.rect)
        };
        let accent = helpers::accent_from(self.color, ctx, slot.index);

        let Some(entity) = &self.entity else {
            helpers::draw_placeholder(ctx, inner);
            return RenderReport::ok();
        };
        let Some(value) = data.resolve(entity) else {
            if let Some(label) = &self.label {
                helpers::draw_top_label(ctx, inner, label);
            }
            helpers::draw_placeholder(ctx, inner);
            return RenderReport::missed(entity.clone());
        };

        // Value string, with the unit tacked on when available.
        let (value_text, name) = match &value {
            DataValue::Number { value, unit, name } => {
                let mut text = glimpse_core::data::format_number(*value);
                if self.show_unit
                    && let Some(unit) = unit
                {
                    text.push_str(unit);
                }
                (text, name.clone())
            }
            other => (
                other.as_text().unwrap_or_else(|| helpers::PLACEHOLDER.to_string()),
                None,
            ),
        };

        let name = self.label.clone().or(name).filter(|_| self.show_name);
        let label_height = match &name {
            Some(name) => helpers::draw_top_label(ctx, inner, name),
            None => 0,
        };

        if let Some(icon) = &self.icon {
            let size = (inner.height / 4).clamp(12, 32);
            ctx.draw_icon(
                icon,
                (inner.x, inner.y + label_height),
                size,
                accent,
            );
        }

        // Pick the biggest tier the value fits at.
        let bold = ctx.theme().value_bold;
        let tier = [FontTier::Huge, FontTier::Xlarge, FontTier::Large, FontTier::Medium]
            .into_iter()
            .find(|tier| ctx.measure_text(&value_text, *tier, bold).0 <= inner.width as u32)
            .unwrap_or(FontTier::Regular);

        let color = ctx.theme().text_primary;
        let value_y = inner.y + label_height + (inner.height - label_height) / 2;
        ctx.draw_text(
            &value_text,
            (inner.center_x(), value_y),
            tier,
            bold,
            color,
            Anchor::CENTER,
        );

        RenderReport::ok()
    }
}
