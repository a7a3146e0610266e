#![forbid(unsafe_code)]

//! Media widget: now-playing title, artist, and progress.

use std::collections::BTreeSet;

use glimpse_core::config::{Align, FontTier, WidgetConfig};
use glimpse_core::data::{DataSource, DataValue, EntityId};
use glimpse_core::{Rect, Rgb};
use glimpse_layout::Slot;
use glimpse_render::{Anchor, RenderContext, VAlign};
use glimpse_text::{RichText, SpanStyle};

use crate::RenderReport;
use crate::helpers;

/// Now-playing card.
#[derive(Debug, Clone)]
pub struct MediaWidget {
    entity: Option<EntityId>,
    label: Option<String>,
    color: Option<Rgb>,
    show_artist: bool,
    show_album: bool,
    show_progress: bool,
}

impl MediaWidget {
    /// Build from configuration.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            label: config.label.clone(),
            color: config.color,
            show_artist: config.options.show_artist.unwrap_or(true),
            show_album: config.options.show_album.unwrap_or(false),
            show_progress: config.options.show_progress.unwrap_or(true),
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

        let value = match self.entity.as_ref().map(|e| (e, data.resolve(e))) {
            Some((_, Some(value))) => Some(value),
            Some((entity, None)) => {
                ctx.draw_icon(
                    "music",
                    (
                        inner.center_x().saturating_sub(8),
                        inner.center_y().saturating_sub(8),
                    ),
                    16,
                    ctx.theme().text_secondary,
                );
                helpers::draw_placeholder(
                    ctx,
                    Rect::new(inner.x, inner.y + inner.height / 3, inner.width, inner.height / 2),
                );
                return RenderReport::missed(entity.clone());
            }
            None => None,
        };

        if let Some(label) = &self.label {
            helpers::draw_top_label(ctx, inner, label);
        }

        let (title, artist, album, position) = match value {
            Some(DataValue::Media {
                title,
                artist,
                album,
                position,
            }) => (title, artist, album, position),
            other => {
                // Bound to something that is not media: show it as text.
                let text = other
                    .and_then(|v| v.as_text())
                    .unwrap_or_else(|| helpers::PLACEHOLDER.to_string());
                ctx.draw_text(
                    &text,
                    (inner.center_x(), inner.center_y()),
                    FontTier::Regular,
                    false,
                    ctx.theme().text_primary,
                    Anchor::CENTER,
                );
                return RenderReport::ok();
            }
        };

        // Title wraps to at most the upper half, ellipsized.
        let title_area = Rect::new(inner.x, inner.y + inner.height / 6, inner.width, inner.height / 3);
        let title_style = SpanStyle::plain().with_tier(FontTier::Medium).with_bold(ctx.theme().value_bold);
        RichText::parse(&title, title_style).draw(ctx, title_area, Align::Center, VAlign::Top);

        let mut line_y = title_area.bottom() + inner.height / 12;
        if self.show_artist
            && let Some(artist) = &artist
        {
            ctx.draw_text(
                artist,
                (inner.center_x(), line_y),
                FontTier::Small,
                false,
                ctx.theme().text_secondary,
                Anchor::CENTER,
            );
            line_y += inner.height / 8;
        }
        if self.show_album
            && let Some(album) = &album
        {
            ctx.draw_text(
                album,
                (inner.center_x(), line_y),
                FontTier::Tiny,
                false,
                ctx.theme().text_secondary,
                Anchor::CENTER,
            );
        }

        if self.show_progress
            && let Some(position) = position
        {
            let bar_height = (inner.height / 16).max(3);
            let bar = Rect::new(
                inner.x,
                inner.bottom().saturating_sub(bar_height + 2),
                inner.width,
                bar_height,
            );
            let background = ctx.theme().panel_border.dim(0.8);
            ctx.draw_bar(bar, position.clamp(0.0, 1.0) * 100.0, accent, background);
        }
        RenderReport::ok()
    }
}
