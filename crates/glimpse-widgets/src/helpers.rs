#![forbid(unsafe_code)]

//! Shared drawing helpers for the widget set.

use glimpse_core::config::FontTier;
use glimpse_core::{Rect, Rgb, Sides};
use glimpse_render::{Anchor, RenderContext};

/// Placeholder shown when a bound value cannot be resolved.
pub(crate) const PLACEHOLDER: &str = "--";

/// The accent color for a widget: config override first, then the
/// theme's cycling palette keyed by slot index.
pub(crate) fn accent_from(
    override_color: Option<Rgb>,
    ctx: &RenderContext<'_>,
    slot_index: usize,
) -> Rgb {
    override_color.unwrap_or_else(|| ctx.theme().accent(slot_index))
}

/// Slot interior after theme padding, without a panel.
pub(crate) fn padded(ctx: &RenderContext<'_>, rect: Rect) -> Rect {
    let pad = ctx.theme().padding_px(rect.width);
    rect.inner(Sides::all(pad))
}

/// Draw the themed panel for a card widget and return its padded
/// interior.
pub(crate) fn panel_inner(ctx: &mut RenderContext<'_>, rect: Rect) -> Rect {
    // Inset by the layout gap so adjacent panels do not touch.
    let gap = ctx.theme().gap / 2;
    let panel = rect.inner(Sides::all(gap));
    ctx.draw_panel(panel);
    padded(ctx, panel)
}

/// Draw an uppercase label across the top of the interior. Returns the
/// vertical space consumed.
pub(crate) fn draw_top_label(ctx: &mut RenderContext<'_>, inner: Rect, label: &str) -> u16 {
    if label.is_empty() || inner.is_empty() {
        return 0;
    }
    let text = label.to_uppercase();
    let color = ctx.theme().text_secondary;
    let y = inner.y + (inner.height / 8);
    ctx.draw_text(
        &text,
        (inner.center_x(), y),
        FontTier::Small,
        false,
        color,
        Anchor::CENTER,
    );
    inner.height / 5
}

/// Draw the missing-value placeholder centered in the interior.
pub(crate) fn draw_placeholder(ctx: &mut RenderContext<'_>, inner: Rect) {
    let color = ctx.theme().text_secondary;
    ctx.draw_text(
        PLACEHOLDER,
        (inner.center_x(), inner.center_y()),
        FontTier::Large,
        false,
        color,
        Anchor::CENTER,
    );
}

/// States the display treats as "on" for binary-ish text values.
pub(crate) fn is_on_state(state: &str) -> bool {
    matches!(
        state.to_ascii_lowercase().as_str(),
        "on" | "true" | "home" | "locked" | "1" | "playing" | "open"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_states_match_the_original_set() {
        for s in ["on", "ON", "true", "home", "locked", "1"] {
            assert!(is_on_state(s), "{s} should be on");
        }
        for s in ["off", "away", "unlocked", "0", "unavailable"] {
            assert!(!is_on_state(s), "{s} should be off");
        }
    }
}
