#![forbid(unsafe_code)]

//! Camera widget: a still frame scaled into the slot.

use std::collections::BTreeSet;

use glimpse_core::config::{FontTier, ImageFit, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId};
use glimpse_core::Rect;
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext};

use crate::RenderReport;
use crate::helpers;

/// Shows the latest frame the host resolved for the bound identifier.
#[derive(Debug, Clone)]
pub struct CameraWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    fit: ImageFit,
}

impl CameraWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            fit: config.options.fit.unwrap_or_default(),
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
        let rect = slot.rect;
        let (src_w, src_h, pixels) = match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((
                _,
                Some(DataValue::Frame {
                    width,
                    height,
                    pixels,
                }),
            )) => (width, height, pixels),
            Some((entity, None)) => {
                helpers::draw_placeholder(ctx, rect);
                return RenderReport::missed(entity.clone());
            }
            // Bound to something that is not a frame, or not bound at
            // all: the placeholder, but nothing is "missing".
            Some((_, Some(_))) | None => {
                helpers::draw_placeholder(ctx, rect);
                return RenderReport::ok();
            }
        };
        if src_w == 0 || src_h == 0 {
            helpers::draw_placeholder(ctx, rect);
            return RenderReport::ok();
        }

        match self.fit {
            ImageFit::Contain => {
                // Letterbox: largest destination preserving aspect.
                let scale_num =
                    (rect.width as u32 * src_h as u32).min(rect.height as u32 * src_w as u32);
                let dst_w = (scale_num / src_h as u32) as u16;
                let dst_h = (scale_num / src_w as u32) as u16;
                let dst = Rect::new(
                    rect.x + (rect.width - dst_w.min(rect.width)) / 2,
                    rect.y + (rect.height - dst_h.min(rect.height)) / 2,
                    dst_w.min(rect.width),
                    dst_h.min(rect.height),
                );
                ctx.blit_frame(dst, src_w, src_h, &pixels);
            }
            ImageFit::Cover => {
                // Center-crop the source to the slot's aspect ratio.
                let (crop_w, crop_h) =
                    if src_w as u32 * rect.height as u32 > rect.width as u32 * src_h as u32 {
                        (
                            ((src_h as u32 * rect.width as u32) / rect.height as u32).max(1) as u16,
                            src_h,
                        )
                    } else {
                        (
                            src_w,
                            ((src_w as u32 * rect.height as u32) / rect.width as u32).max(1) as u16,
                        )
                    };
                let x0 = (src_w - crop_w) / 2;
                let y0 = (src_h - crop_h) / 2;
                let mut cropped = Vec::with_capacity(crop_w as usize * crop_h as usize * 3);
                for row in y0..y0 + crop_h {
                    let start = (row as usize * src_w as usize + x0 as usize) * 3;
                    let end = start + crop_w as usize * 3;
                    if end <= pixels.len() {
                        cropped.extend_from_slice(&pixels[start..end]);
                    }
                }
                ctx.blit_frame(rect, crop_w, crop_h, &cropped);
            }
        }

        if let Some(label) = &self.label {
            ctx.draw_text(
                &label.to_uppercase(),
                (rect.center_x(), rect.bottom().saturating_sub(8)),
                FontTier::Tiny,
                false,
                ctx.theme().text_primary,
                Anchor::BOTTOM_CENTER,
            );
        }
        RenderReport::ok()
    }
}
