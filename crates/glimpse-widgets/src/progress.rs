#![forbid(unsafe_code)]

//! Progress widgets: a single value against a target, and a titled
//! list of progress rows.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, ListItem, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId, format_number};
use glimpse_core::{Rect, Rgb};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

/// Progress toward a numeric target.
#[derive(Debug, Clone)]
pub struct ProgressWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    color: Option<Rgb>,
    icon: Option<String>,
    target: f64,
    unit: Option<String>,
    show_target: bool,
}

impl ProgressWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            color: config.color,
            icon: config.icon.clone(),
            target: config.options.target.unwrap_or(100.0),
            unit: config.options.unit.clone(),
            show_target: config.options.show_target.unwrap_or(true),
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
        let accent = helpers::accent_from(self.color, ctx, slot.index);

        let mut report = RenderReport::ok();
        let mut value: Option<f64> = None;
        let mut unit = self.unit.clone();
        let mut name = self.label.clone();

        match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(resolved))) => {
                value = resolved.as_number();
                if let DataValue::Number {
                    unit: value_unit,
                    name: value_name,
                    ..
                } = &resolved
                {
                    if unit.is_none() {
                        unit = value_unit.clone();
                    }
                    if name.is_none() {
                        name = value_name.clone();
                    }
                }
            }
            Some((entity, None)) => report = RenderReport::missed(entity.clone()),
            None => {}
        }

        let label_height = match &name {
            Some(name) => helpers::draw_top_label(ctx, inner, name),
            None => 0,
        };
        if let Some(icon) = &self.icon {
            let size = (inner.height / 5).clamp(10, 24);
            ctx.draw_icon(icon, (inner.x, inner.y + label_height), size, accent);
        }

        let percent = match value {
            Some(v) if self.target > 0.0 => ((v / self.target) * 100.0).clamp(0.0, 100.0) as f32,
            _ => 0.0,
        };

        // Caption: "value / target unit" (or a placeholder).
        let caption = match value {
            Some(v) if self.show_target => {
                let mut s = format!("{} / {}", format_number(v), format_number(self.target));
                if let Some(unit) = &unit {
                    s.push_str(unit);
                }
                s
            }
            Some(v) => {
                let mut s = format_number(v);
                if let Some(unit) = &unit {
                    s.push_str(unit);
                }
                s
            }
            None => helpers::PLACEHOLDER.to_string(),
        };

        let caption_y = inner.y + label_height + (inner.height - label_height) / 3;
        ctx.draw_text(
            &caption,
            (inner.center_x(), caption_y),
            FontTier::Medium,
            ctx.theme().value_bold,
            ctx.theme().text_primary,
            Anchor::CENTER,
        );

        let bar_height = ((inner.height as u32 * 15 / 100) as u16).max(6);
        let bar_y = inner.bottom().saturating_sub(inner.height / 4 + bar_height / 2);
        let bar = Rect::new(inner.x, bar_y, inner.width, bar_height);
        let background = ctx.theme().panel_border.dim(0.8);
        ctx.draw_bar(bar, percent, accent, background);

        report
    }
}

/// Several progress rows in one slot, each bound to its own value.
#[derive(Debug, Clone)]
pub struct MultiProgressWidget {
    items: Vec<ListItem>,
    title: Option<String>,
    color: Option<Rgb>,
}

impl MultiProgressWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        let mut items = config.options.items.clone().unwrap_or_default();
        // A bare entity binding acts as a single row, so the widget
        // still shows something useful with minimal config.
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
            color: config.color,
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
        let row_height = (body.height / self.items.len().min(6) as u16).max(12);

        for (i, item) in self.items.iter().take(6).enumerate() {
            let row_y = body.y + i as u16 * row_height;
            if row_y + row_height > body.bottom() {
                break;
            }
            let accent = helpers::accent_from(self.color, ctx, slot.index + i);

            let percent = match data.resolve(&item.entity) {
                Some(value) => value.as_number().unwrap_or(0.0).clamp(0.0, 100.0) as f32,
                None => {
                    report.merge(RenderReport::missed(item.entity.clone()));
                    0.0
                }
            };

            let label = item
                .label
                .clone()
                .unwrap_or_else(|| item.entity.as_str().to_string());
            ctx.draw_text(
                &label.to_uppercase(),
                (body.x, row_y + row_height / 4),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::MID_LEFT,
            );
            ctx.draw_text(
                &format!("{}%", percent as u32),
                (body.right(), row_y + row_height / 4),
                FontTier::Tiny,
                false,
                ctx.theme().text_primary,
                Anchor::MID_RIGHT,
            );

            let bar_height = (row_height / 4).max(4);
            let bar = Rect::new(
                body.x,
                row_y + row_height / 2,
                body.width,
                bar_height,
            );
            let background = ctx.theme().panel_border.dim(0.8);
            ctx.draw_bar(bar, percent, accent, background);
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

    fn slot() -> Slot {
        Slot {
            index: 0,
            rect: Rect::new(0, 0, 120, 120),
        }
    }

    #[test]
    fn progress_reports_missing_binding() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut config = WidgetConfig::new(WidgetKind::Progress, 0);
        config.entity = Some(EntityId::new("sensor.steps"));
        let widget = ProgressWidget::new(&config);
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let report = widget.render(&mut ctx, slot(), &StaticData::new());
        assert!(report.missing.contains(&EntityId::new("sensor.steps")));
    }

    #[test]
    fn multi_progress_collects_every_missing_row() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut config = WidgetConfig::new(WidgetKind::MultiProgress, 0);
        config.options.items = Some(vec![
            ListItem {
                entity: EntityId::new("sensor.a"),
                label: Some("A".into()),
            },
            ListItem {
                entity: EntityId::new("sensor.b"),
                label: None,
            },
        ]);
        let data = StaticData::new().with("sensor.a", DataValue::Number {
            value: 40.0,
            unit: None,
            name: None,
        });
        let widget = MultiProgressWidget::new(&config);
        assert_eq!(widget.dependencies().len(), 2);

        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let report = widget.render(&mut ctx, slot(), &data);
        assert_eq!(report.missing.len(), 1);
        assert!(report.missing.contains(&EntityId::new("sensor.b")));
    }

    #[test]
    fn bare_entity_becomes_a_single_row() {
        let mut config = WidgetConfig::new(WidgetKind::MultiProgress, 0);
        config.entity = Some(EntityId::new("sensor.solo"));
        let widget = MultiProgressWidget::new(&config);
        assert_eq!(widget.dependencies().len(), 1);
    }
}
