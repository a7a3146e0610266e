#![forbid(unsafe_code)]

//! Chart widget: a sparkline of a value's history.
//!
//! History arrives through the data lookup as a series bound to
//! `<entity>.history`; the host decides how much history that is.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId, format_number};
use glimpse_core::{Rect, Rgb};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

/// Sparkline with a current-value header and a min/max footer.
#[derive(Debug, Clone)]
pub struct ChartWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    color: Option<Rgb>,
    show_value: bool,
    show_range: bool,
}

impl ChartWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            color: config.color,
            show_value: config.options.show_value.unwrap_or(true),
            show_range: config.options.show_range.unwrap_or(true),
        }
    }

    fn history_id(&self) -> Option<EntityId> {
        self.entity
            .as_ref()
            .map(|e| EntityId::new(format!("{e}.history")))
    }

    /// The value and its history series.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        let mut deps: BTreeSet<EntityId> = self.entity.iter().cloned().collect();
        deps.extend(self.history_id());
        deps
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

        let mut current: Option<f64> = None;
        let mut unit: Option<String> = None;
        let mut name = self.label.clone();
        match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => {
                current = value.as_number();
                if let DataValue::Number {
                    unit: value_unit,
                    name: value_name,
                    ..
                } = &value
                {
                    unit = value_unit.clone();
                    if name.is_none() {
                        name = value_name.clone();
                    }
                }
            }
            Some((entity, None)) => report = RenderReport::missed(entity.clone()),
            None => {}
        }

        let history = match self.history_id().map(|id| data.resolve(&id)) {
            Some(Some(DataValue::Series(values))) => values,
            _ => Vec::new(),
        };

        // Header: name left, current value right.
        let header_height = inner.height / 6;
        if let Some(name) = &name {
            ctx.draw_text(
                &name.to_uppercase(),
                (inner.x, inner.y + header_height / 2),
                FontTier::Small,
                false,
                ctx.theme().text_secondary,
                Anchor::MID_LEFT,
            );
        }
        if self.show_value {
            let value_text = match current {
                Some(v) => {
                    let mut s = format_number(v);
                    if let Some(unit) = &unit {
                        s.push_str(unit);
                    }
                    s
                }
                None => helpers::PLACEHOLDER.to_string(),
            };
            ctx.draw_text(
                &value_text,
                (inner.right(), inner.y + header_height / 2),
                FontTier::Regular,
                ctx.theme().value_bold,
                ctx.theme().text_primary,
                Anchor::MID_RIGHT,
            );
        }

        let footer_height = if self.show_range { inner.height / 8 } else { 0 };
        let chart = Rect::new(
            inner.x,
            inner.y + header_height,
            inner.width,
            inner
                .height
                .saturating_sub(header_height + footer_height + 2),
        );

        if history.len() >= 2 {
            ctx.draw_sparkline(chart, &history, accent, true, true);
        } else {
            ctx.draw_text(
                "no history",
                (chart.center_x(), chart.center_y()),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::CENTER,
            );
        }

        if self.show_range
            && history.len() >= 2
        {
            let (min, max) = history.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, &v| {
                (acc.0.min(v), acc.1.max(v))
            });
            let footer_y = inner.bottom().saturating_sub(footer_height / 2);
            ctx.draw_text(
                &format_number(min),
                (inner.x, footer_y),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::MID_LEFT,
            );
            ctx.draw_text(
                &format_number(max),
                (inner.right(), footer_y),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::MID_RIGHT,
            );
        }
        report
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

    fn widget() -> ChartWidget {
        let mut config = WidgetConfig::new(WidgetKind::Chart, 0);
        config.entity = Some(EntityId::new("sensor.power"));
        ChartWidget::new(&config)
    }

    #[test]
    fn dependencies_include_history() {
        let deps = widget().dependencies();
        assert!(deps.contains(&EntityId::new("sensor.power")));
        assert!(deps.contains(&EntityId::new("sensor.power.history")));
    }

    #[test]
    fn renders_sparkline_with_history() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let data = StaticData::new()
            .with("sensor.power", DataValue::Number {
                value: 350.0,
                unit: Some("W".into()),
                name: Some("Power".into()),
            })
            .with(
                "sensor.power.history",
                DataValue::Series(vec![320.0, 340.0, 310.0, 390.0, 350.0]),
            );
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let slot = Slot {
            index: 0,
            rect: Rect::new(0, 0, 240, 120),
        };
        let report = widget().render(&mut ctx, slot, &data);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn missing_value_still_draws_and_reports() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let slot = Slot {
            index: 0,
            rect: Rect::new(0, 0, 120, 120),
        };
        let report = widget().render(&mut ctx, slot, &StaticData::new());
        assert!(report.missing.contains(&EntityId::new("sensor.power")));
    }
}
