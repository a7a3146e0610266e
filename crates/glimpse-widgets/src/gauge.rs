#![forbid(unsafe_code)]

//! Gauge widget: a value shown as a bar, ring, or arc.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, GaugeStyle, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId, format_number};
use glimpse_core::{Rect, Rgb};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

/// Maps a bound value onto a 0-100% sweep between `min` and `max`.
#[derive(Debug, Clone)]
pub struct GaugeWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    color: Option<Rgb>,
    icon: Option<String>,
    style: GaugeStyle,
    min: f64,
    max: f64,
    unit: Option<String>,
    show_value: bool,
}

impl GaugeWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            color: config.color,
            icon: config.icon.clone(),
            style: config.options.style.unwrap_or_default(),
            min: config.options.min.unwrap_or(0.0),
            max: config.options.max.unwrap_or(100.0),
            unit: config.options.unit.clone(),
            show_value: config.options.show_value.unwrap_or(true),
        }
    }

    /// The bound identifier, when configured.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        self.entity.iter().cloned().collect()
    }

    /// Percent of the configured range, clamped to 0-100.
    fn percent(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (((value - self.min) / range) * 100.0).clamp(0.0, 100.0) as f32
    }

    /// Render into the slot.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        slot: Slot,
        data: &dyn DataSource,
    ) -> RenderReport {
        let inner = helpers::panel_inner(ctx, slot.rect);
        let accent = helpers::accent_from(self.color, ctx, slot.index);

        let mut report = RenderReport::ok();
        let mut display_value = helpers::PLACEHOLDER.to_string();
        let mut percent = 0.0f32;
        let mut name = self.label.clone();
        let mut unit = self.unit.clone();

        match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => {
                if let Some(number) = value.as_number() {
                    percent = self.percent(number);
                    display_value = format_number(number);
                }
                if let DataValue::Number {
                    unit: value_unit,
                    name: value_name,
                    ..
                } = &value
                {
                    if unit.is_none() {
                        unit = value_unit.clone();
                    }
                    if name.is_none() {
                        name = value_name.clone();
                    }
                }
            }
            Some((entity, None)) => {
                report = RenderReport::missed(entity.clone());
            }
            None => {}
        }

        if self.show_value
            && let Some(unit) = &unit
            && display_value != helpers::PLACEHOLDER
        {
            display_value.push_str(unit);
        }

        match self.style {
            GaugeStyle::Bar => self.render_bar(ctx, inner, percent, &display_value, name.as_deref(), accent),
            GaugeStyle::Ring => self.render_ring(ctx, inner, percent, &display_value, name.as_deref(), accent),
            GaugeStyle::Arc => self.render_arc(ctx, inner, percent, &display_value, name.as_deref(), accent),
        }
        report
    }

    fn render_bar(
        &self,
        ctx: &mut RenderContext<'_>,
        inner: Rect,
        percent: f32,
        value: &str,
        name: Option<&str>,
        accent: Rgb,
    ) {
        let secondary = ctx.theme().text_secondary;
        let label_y = inner.y + inner.height / 3;
        let icon_size = ((inner.height as u32 * 23 / 100) as u16).max(10);

        let mut text_x = inner.x;
        if let Some(icon) = &self.icon {
            ctx.draw_icon(icon, (inner.x, label_y.saturating_sub(icon_size / 2)), icon_size, accent);
            text_x = inner.x + icon_size + 4;
        }
        if let Some(name) = name {
            ctx.draw_text(
                &name.to_uppercase(),
                (text_x, label_y),
                FontTier::Tiny,
                false,
                secondary,
                Anchor::MID_LEFT,
            );
        }
        if self.show_value {
            ctx.draw_text(
                value,
                (inner.right(), label_y),
                FontTier::Medium,
                true,
                ctx.theme().text_primary,
                Anchor::MID_RIGHT,
            );
        }

        let bar_height = ((inner.height as u32 * 17 / 100) as u16).max(6);
        let bar_y = inner.y + inner.height * 2 / 3 - bar_height / 2;
        let bar = Rect::new(inner.x, bar_y, inner.width, bar_height);
        let background = ctx.theme().panel_border.dim(0.8);
        ctx.draw_bar(bar, percent, accent, background);
    }

    fn render_ring(
        &self,
        ctx: &mut RenderContext<'_>,
        inner: Rect,
        percent: f32,
        value: &str,
        name: Option<&str>,
        accent: Rgb,
    ) {
        let center = (inner.center_x(), inner.center_y());
        let radius = (inner.width.min(inner.height) / 2).saturating_sub(4);
        let width = (radius / 5).max(4);
        let background = ctx.theme().panel_border.dim(0.8);
        ctx.draw_ring_gauge(center, radius, percent, accent, background, width);

        if self.show_value {
            ctx.draw_text(
                value,
                center,
                FontTier::Medium,
                ctx.theme().value_bold,
                ctx.theme().text_primary,
                Anchor::CENTER,
            );
        }
        if let Some(name) = name {
            ctx.draw_text(
                &name.to_uppercase(),
                (center.0, inner.bottom().saturating_sub(2)),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::BOTTOM_CENTER,
            );
        }
    }

    fn render_arc(
        &self,
        ctx: &mut RenderContext<'_>,
        inner: Rect,
        percent: f32,
        value: &str,
        name: Option<&str>,
        accent: Rgb,
    ) {
        let side = inner.width.min(inner.height);
        let arc = Rect::new(
            inner.x + (inner.width - side) / 2,
            inner.y + (inner.height - side) / 2,
            side,
            side,
        );
        let width = (side / 10).max(6);
        let background = ctx.theme().panel_border.dim(0.8);
        ctx.draw_arc_gauge(arc, percent, accent, background, width);

        if self.show_value {
            ctx.draw_text(
                value,
                (arc.center_x(), arc.center_y()),
                FontTier::Large,
                ctx.theme().value_bold,
                ctx.theme().text_primary,
                Anchor::CENTER,
            );
        }
        if let Some(name) = name {
            // The 270° sweep leaves the bottom gap free for the label.
            ctx.draw_text(
                &name.to_uppercase(),
                (arc.center_x(), arc.bottom().saturating_sub(4)),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::BOTTOM_CENTER,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::config::WidgetKind;
    use glimpse_core::data::StaticData;
    use glimpse_core::Size;
    use glimpse_render::FontLibrary;
    use glimpse_style::Theme;

    fn gauge(style: GaugeStyle, min: f64, max: f64) -> GaugeWidget {
        let mut config = WidgetConfig::new(WidgetKind::Gauge, 0);
        config.entity = Some(EntityId::new("sensor.load"));
        config.options.style = Some(style);
        config.options.min = Some(min);
        config.options.max = Some(max);
        GaugeWidget::new(&config)
    }

    #[test]
    fn percent_clamps_to_range() {
        let g = gauge(GaugeStyle::Bar, 0.0, 200.0);
        assert_eq!(g.percent(100.0), 50.0);
        assert_eq!(g.percent(-50.0), 0.0);
        assert_eq!(g.percent(500.0), 100.0);
    }

    #[test]
    fn degenerate_range_is_zero_percent() {
        let g = gauge(GaugeStyle::Bar, 10.0, 10.0);
        assert_eq!(g.percent(10.0), 0.0);
    }

    #[test]
    fn all_styles_render_with_data() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let data = StaticData::new().with("sensor.load", DataValue::Number {
            value: 65.0,
            unit: Some("%".into()),
            name: Some("Load".into()),
        });
        for style in [GaugeStyle::Bar, GaugeStyle::Ring, GaugeStyle::Arc] {
            let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
            let slot = Slot {
                index: 0,
                rect: glimpse_core::Rect::new(0, 0, 120, 120),
            };
            let report = gauge(style, 0.0, 100.0).render(&mut ctx, slot, &data);
            assert!(report.missing.is_empty(), "{style:?}");
        }
    }

    #[test]
    fn missing_entity_reports_and_still_draws_the_track() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let slot = Slot {
            index: 0,
            rect: glimpse_core::Rect::new(0, 0, 120, 120),
        };
        let report = gauge(GaugeStyle::Ring, 0.0, 100.0).render(&mut ctx, slot, &StaticData::new());
        assert!(report.missing.contains(&EntityId::new("sensor.load")));
    }
}
