#![forbid(unsafe_code)]

//! Weather widget: condition icon, temperature, and companion readings.
//!
//! The host exposes weather as a family of identifiers derived from the
//! bound one: `<entity>` resolves to the condition text, and
//! `<entity>.temperature`, `.humidity`, `.wind_speed`, and `.forecast`
//! carry the companion values. Whatever is missing simply stays blank;
//! only the condition itself renders the placeholder.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId, format_number};
use glimpse_core::Rect;
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

/// Condition string → icon name.
fn condition_icon(condition: &str) -> &'static str {
    match condition {
        "sunny" | "clear" => "sun",
        "clear-night" => "moon",
        "partlycloudy" | "cloudy" | "snowy" | "fog" => "cloud",
        "rainy" | "pouring" => "rain",
        "windy" => "wind",
        "lightning" | "lightning-rainy" => "bolt",
        _ => "cloud",
    }
}

/// Current conditions with optional humidity, wind, and forecast strip.
#[derive(Debug, Clone)]
pub struct WeatherWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    show_forecast: bool,
    forecast_days: u8,
    show_humidity: bool,
    show_wind: bool,
}

impl WeatherWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            show_forecast: config.options.show_forecast.unwrap_or(true),
            forecast_days: config.options.forecast_days.unwrap_or(3),
            show_humidity: config.options.show_humidity.unwrap_or(true),
            show_wind: config.options.show_wind.unwrap_or(false),
        }
    }

    fn derived(&self, suffix: &str) -> Option<EntityId> {
        self.entity
            .as_ref()
            .map(|e| EntityId::new(format!("{e}.{suffix}")))
    }

    /// The condition identifier plus each companion reading in use.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<EntityId> {
        let mut deps: BTreeSet<EntityId> = self.entity.iter().cloned().collect();
        deps.extend(self.derived("temperature"));
        if self.show_humidity {
            deps.extend(self.derived("humidity"));
        }
        if self.show_wind {
            deps.extend(self.derived("wind_speed"));
        }
        if self.show_forecast {
            deps.extend(self.derived("forecast"));
        }
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
        let accent = helpers::accent_from(None, ctx, slot.index);
        let mut report = RenderReport::ok();

        let condition = match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => value.as_text(),
            Some((entity, None)) => {
                report = RenderReport::missed(entity.clone());
                None
            }
            None => None,
        };

        if let Some(label) = &self.label {
            helpers::draw_top_label(ctx, inner, label);
        }

        let Some(condition) = condition else {
            helpers::draw_placeholder(ctx, inner);
            return report;
        };

        let center_x = inner.center_x();
        let icon_size = (inner.height / 3).clamp(16, 48);
        ctx.draw_icon(
            condition_icon(&condition),
            (center_x.saturating_sub(icon_size / 2), inner.y + inner.height / 8),
            icon_size,
            accent,
        );

        // Temperature, front and center.
        let temp = self
            .derived("temperature")
            .and_then(|id| data.resolve(&id))
            .and_then(|v| v.as_number());
        let temp_text = match temp {
            Some(t) => format!("{}°", format_number(t)),
            None => helpers::PLACEHOLDER.to_string(),
        };
        let temp_y = inner.y + inner.height / 2 + inner.height / 12;
        ctx.draw_text(
            &temp_text,
            (center_x, temp_y),
            FontTier::Large,
            ctx.theme().value_bold,
            ctx.theme().text_primary,
            Anchor::CENTER,
        );

        // Companion readings under the temperature.
        let mut companions: Vec<String> = Vec::new();
        if self.show_humidity
            && let Some(h) = self
                .derived("humidity")
                .and_then(|id| data.resolve(&id))
                .and_then(|v| v.as_number())
        {
            companions.push(format!("{}%", format_number(h)));
        }
        if self.show_wind
            && let Some(w) = self
                .derived("wind_speed")
                .and_then(|id| data.resolve(&id))
                .and_then(|v| v.as_number())
        {
            companions.push(format!("{} km/h", format_number(w)));
        }
        if !companions.is_empty() {
            ctx.draw_text(
                &companions.join("  "),
                (center_x, temp_y + inner.height / 7),
                FontTier::Small,
                false,
                ctx.theme().text_secondary,
                Anchor::CENTER,
            );
        }

        // Forecast strip: daily highs across the bottom edge.
        if self.show_forecast
            && let Some(DataValue::Series(values)) =
                self.derived("forecast").and_then(|id| data.resolve(&id))
        {
            let days = values.iter().take(self.forecast_days.max(1) as usize);
            let count = days.clone().count() as u16;
            if count > 0 {
                let strip = Rect::new(
                    inner.x,
                    inner.bottom().saturating_sub(inner.height / 7),
                    inner.width,
                    inner.height / 7,
                );
                let cell = strip.width / count;
                for (i, high) in days.enumerate() {
                    let x = strip.x + i as u16 * cell + cell / 2;
                    ctx.draw_text(
                        &format!("{}°", format_number(*high)),
                        (x, strip.center_y()),
                        FontTier::Tiny,
                        false,
                        ctx.theme().text_secondary,
                        Anchor::CENTER,
                    );
                }
            }
        }
        report
    }
}
