#![forbid(unsafe_code)]

//! One synchronous pass from a `Screen` to an encoded image.
//!
//! The pipeline owns the explicit-fallback policy: an unknown theme or
//! layout is logged and replaced with the default, a widget whose slot
//! index exceeds the layout's slot count is skipped with a warning,
//! and missing data values are collected per cycle rather than failing
//! it. Only font setup and encoding can actually error here.

use std::collections::BTreeSet;
use std::sync::Arc;

use glimpse_core::config::Screen;
use glimpse_core::data::{DataSource, EntityId};
use glimpse_core::{Rect, Sides, Size};
use glimpse_layout::{LayoutKind, Slot, compute_slots};
use glimpse_render::image::RgbImage;
use glimpse_render::{FontLibrary, RenderContext, encode_jpeg, encode_png};
use glimpse_style::ThemeRegistry;
use glimpse_widgets::BuiltWidget;

use crate::error::RuntimeError;

/// The physical display resolution in logical pixels.
pub const CANVAS_SIZE: Size = Size::new(240, 240);

/// Default JPEG quality for uploads.
pub use glimpse_render::encode::DEFAULT_JPEG_QUALITY;

/// What one render pass observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Data identifiers widgets needed but could not resolve.
    pub missing: BTreeSet<EntityId>,
    /// Slot indices that were configured but outside the layout.
    pub skipped_slots: Vec<usize>,
}

/// Shared, read-only rendering dependencies: theme registry and fonts.
///
/// Cloning is cheap; all device coordinators share one instance.
#[derive(Debug, Clone)]
pub struct Pipeline {
    themes: Arc<ThemeRegistry>,
    fonts: Arc<FontLibrary>,
}

impl Pipeline {
    /// Pipeline over shared registries.
    #[must_use]
    pub fn new(themes: Arc<ThemeRegistry>, fonts: Arc<FontLibrary>) -> Self {
        Self { themes, fonts }
    }

    /// Pipeline with built-in themes and system fonts.
    pub fn with_defaults() -> Result<Self, RuntimeError> {
        Ok(Self::new(
            Arc::new(ThemeRegistry::with_builtins()),
            Arc::new(FontLibrary::load()?),
        ))
    }

    /// Compose a screen into an image.
    pub fn render_screen(
        &self,
        screen: &Screen,
        data: &dyn DataSource,
    ) -> (RgbImage, CycleReport) {
        let _span =
            tracing::debug_span!("render_screen", screen = %screen.id, layout = %screen.layout)
                .entered();

        let theme = self.themes.resolve_or_default(&screen.theme);
        let layout = match LayoutKind::from_id(&screen.layout) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(layout = %screen.layout, "{err}, falling back to grid_2x2");
                LayoutKind::Grid2x2
            }
        };

        // Layout padding shrinks the slot area; slots stay a pure
        // function of (layout, inner size).
        let pad = theme.layout_padding;
        let inner = Rect::from_size(CANVAS_SIZE).inner(Sides::all(pad));
        let slots: Vec<Slot> = compute_slots(layout, Size::new(inner.width, inner.height))
            .into_iter()
            .map(|slot| Slot {
                index: slot.index,
                rect: Rect::new(
                    slot.rect.x + inner.x,
                    slot.rect.y + inner.y,
                    slot.rect.width,
                    slot.rect.height,
                ),
            })
            .collect();

        let mut ctx = RenderContext::new(CANVAS_SIZE, theme, &self.fonts);
        let mut report = CycleReport::default();

        for config in &screen.widgets {
            let Some(slot) = slots.get(config.slot).copied() else {
                tracing::warn!(
                    widget = config.kind.tag(),
                    slot = config.slot,
                    layout = layout.id(),
                    "configured slot is outside the layout, skipping widget"
                );
                report.skipped_slots.push(config.slot);
                continue;
            };
            let widget = BuiltWidget::from_config(config);
            ctx.set_clip(Some(slot.rect));
            let widget_report = widget.render(&mut ctx, slot, data);
            ctx.set_clip(None);
            report.missing.extend(widget_report.missing);
        }

        if !report.missing.is_empty() {
            tracing::debug!(
                missing = report.missing.len(),
                "cycle rendered with missing data values"
            );
        }
        (ctx.finish(), report)
    }

    /// Compose and JPEG-encode a screen for device upload.
    pub fn render_jpeg(
        &self,
        screen: &Screen,
        data: &dyn DataSource,
    ) -> Result<(Vec<u8>, CycleReport), RuntimeError> {
        let (img, report) = self.render_screen(screen, data);
        let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY, None)?;
        Ok((bytes, report))
    }
}

/// Synchronous one-shot preview of the full pipeline, PNG-encoded,
/// with no device communication. Used by the external config UI.
pub fn render_preview(
    screen: &Screen,
    pipeline: &Pipeline,
    data: &dyn DataSource,
) -> Result<Vec<u8>, RuntimeError> {
    let (img, _report) = pipeline.render_screen(screen, data);
    Ok(encode_png(&img)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::config::{WidgetConfig, WidgetKind};
    use glimpse_core::data::{DataValue, StaticData};

    fn pipeline() -> Option<Pipeline> {
        let fonts = FontLibrary::load_or_skip()?;
        Some(Pipeline::new(
            Arc::new(ThemeRegistry::with_builtins()),
            Arc::new(fonts),
        ))
    }

    fn screen() -> Screen {
        let mut screen = Screen::with_default_widgets("dev1");
        let mut gauge = WidgetConfig::new(WidgetKind::Gauge, 1);
        gauge.entity = Some(EntityId::new("sensor.cpu"));
        screen.widgets.push(gauge);
        screen
    }

    #[test]
    fn renders_at_display_resolution() {
        let Some(pipeline) = pipeline() else { return };
        let data = StaticData::new().with("sensor.cpu", DataValue::Number {
            value: 42.0,
            unit: Some("%".into()),
            name: Some("CPU".into()),
        });
        let (img, report) = pipeline.render_screen(&screen(), &data);
        assert_eq!(img.dimensions(), (240, 240));
        assert!(report.missing.is_empty());
        assert!(report.skipped_slots.is_empty());
    }

    #[test]
    fn unknown_theme_and_layout_fall_back() {
        let Some(pipeline) = pipeline() else { return };
        let mut s = screen();
        s.theme = "not_a_theme".into();
        s.layout = "not_a_layout".into();
        let (img, _) = pipeline.render_screen(&s, &StaticData::new());
        assert_eq!(img.dimensions(), (240, 240));
    }

    #[test]
    fn out_of_layout_slot_is_skipped_not_fatal() {
        let Some(pipeline) = pipeline() else { return };
        let mut s = screen();
        // grid_2x2 has 4 slots; index 9 cannot exist.
        s.widgets.push(WidgetConfig::new(WidgetKind::Clock, 9));
        let (_, report) = pipeline.render_screen(&s, &StaticData::new());
        assert_eq!(report.skipped_slots, vec![9]);
    }

    #[test]
    fn missing_data_is_collected_not_fatal() {
        let Some(pipeline) = pipeline() else { return };
        let (_, report) = pipeline.render_screen(&screen(), &StaticData::new());
        assert!(report.missing.contains(&EntityId::new("sensor.cpu")));
    }

    #[test]
    fn preview_returns_png() {
        let Some(pipeline) = pipeline() else { return };
        let bytes = render_preview(&screen(), &pipeline, &StaticData::new()).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn jpeg_output_is_jpeg() {
        let Some(pipeline) = pipeline() else { return };
        let (bytes, _) = pipeline.render_jpeg(&screen(), &StaticData::new()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
