#![forbid(unsafe_code)]

//! Text widget: static or entity-bound rich text.

use std::collections::BTreeSet;

use glimpse_core::config::{Align, FontTier, WidgetConfig};
use glimpse_core::data::{DataSource, EntityId};
use glimpse_core::Rgb;
use glimpse_layout::Slot;
use glimpse_render::{RenderContext, VAlign};
use glimpse_text::{RichText, SpanStyle};

use crate::RenderReport;
use crate::helpers;

/// Free-form text with markup, or the text of a bound value.
#[derive(Debug, Clone)]
pub struct TextWidget {
    entity: Option<EntityId>,
    text: String,
    label: Option<String>,
    color: Option<Rgb>,
    tier: FontTier,
    align: Align,
}

impl TextWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            text: config.options.text.clone().unwrap_or_default(),
            label: config.label.clone(),
            color: config.color,
            tier: config.options.size.unwrap_or_default(),
            align: config.options.align.unwrap_or_default(),
        }
    }

    /// The bound identifier, when configured.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        self.entity.iter().cloned().collect()
    }

    fn base_style(&self) -> SpanStyle {
        let style = SpanStyle::plain().with_tier(self.tier);
        match self.color {
            Some(color) => style.with_color(color),
            None => style,
        }
    }

    /// Preferred size of the wrapped content.
    pub fn measure(
        &self,
        ctx: &mut RenderContext<'_>,
        max_width: u32,
        max_height: u32,
    ) -> (u32, u32) {
        let (w, h) = RichText::parse(&self.text, self.base_style()).measure(ctx, max_width);
        (w, h.min(max_height))
    }

    /// Render into the slot.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        let inner = helpers::padded(ctx, slot.rect);

        // A bound value's text wins over the configured text.
        let (content, report) = match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => (
                value.as_text().unwrap_or_else(|| self.text.clone()),
                RenderReport::ok(),
            ),
            Some((entity, None)) => (
                helpers::PLACEHOLDER.to_string(),
                RenderReport::missed(entity.clone()),
            ),
            None => (self.text.clone(), RenderReport::ok()),
        };

        let label_height = match &self.label {
            Some(label) => helpers::draw_top_label(ctx, inner, label),
            None => 0,
        };
        let body = glimpse_core::Rect::new(
            inner.x,
            inner.y + label_height,
            inner.width,
            inner.height.saturating_sub(label_height),
        );

        RichText::parse(&content, self.base_style()).draw(ctx, body, self.align, VAlign::Middle);
        report
    }
}
