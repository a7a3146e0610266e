#![forbid(unsafe_code)]

//! Built-in geometric icons.
//!
//! Icons are drawn from primitives rather than a glyph font so they
//! stay crisp at any size on the supersampled canvas. Unknown names
//! draw nothing (logged at debug); widgets treat icons as decoration.

use glimpse_core::{Rect, Rgb};

use crate::context::RenderContext;

/// Names the renderer understands.
pub const ICON_NAMES: &[&str] = &[
    "cpu", "memory", "disk", "temp", "power", "bolt", "network", "home", "sun", "drop", "moon",
    "cloud", "rain", "wind", "lock", "music",
];

/// Draw an icon with its top-left corner at `position`.
pub(crate) fn draw(
    ctx: &mut RenderContext<'_>,
    name: &str,
    position: (u16, u16),
    size: u16,
    color: Rgb,
) {
    let (x, y) = position;
    let s = size.max(8);
    let half = s / 2;
    let quarter = s / 4;

    match name {
        "cpu" => {
            // Chip body with pins top and bottom.
            let body = Rect::new(x + quarter, y + quarter, s - 2 * quarter, s - 2 * quarter);
            ctx.stroke_rounded_rect(body, 0, 1, color);
            for i in 0..3u16 {
                let px = x + quarter + i * quarter;
                ctx.draw_line(&[(px, y), (px, y + quarter)], 1, color);
                ctx.draw_line(&[(px, y + s - quarter), (px, y + s)], 1, color);
            }
        }
        "memory" => {
            ctx.stroke_rounded_rect(
                Rect::new(x + 2, y + quarter, s - 4, s - 2 * quarter),
                0,
                1,
                color,
            );
            for i in 0..3u16 {
                let cx = x + 4 + i * (quarter + 1);
                ctx.fill_rect(
                    Rect::new(cx, y + quarter + 2, 2, (s - 2 * quarter).saturating_sub(4)),
                    color,
                );
            }
        }
        "disk" => {
            ctx.stroke_rounded_rect(
                Rect::new(x + 1, y + quarter, s - 2, s - 2 * quarter),
                2,
                1,
                color,
            );
            ctx.draw_ellipse(
                Rect::new(x + s - quarter - 2, half + y - 2, 4, 4),
                Some(color),
                None,
                1,
            );
        }
        "temp" => {
            // Thermometer: stem outline, bulb, mercury column.
            let cx = x + half;
            ctx.draw_ellipse(
                Rect::new(cx.saturating_sub(3), y + s - 7, 6, 6),
                None,
                Some(color),
                1,
            );
            ctx.stroke_rounded_rect(
                Rect::new(cx.saturating_sub(2), y + 2, 4, s - 7),
                2,
                1,
                color,
            );
            ctx.fill_rect(
                Rect::new(cx.saturating_sub(1), y + half, 2, (s - half).saturating_sub(4)),
                color,
            );
        }
        "power" | "bolt" => {
            let points = [
                (x + half + 1, y),
                (x + 2, y + half),
                (x + half - 1, y + half),
                (x + half.saturating_sub(3), y + s),
                (x + s - 2, y + half.saturating_sub(2)),
                (x + half + 1, y + half.saturating_sub(2)),
            ];
            ctx.fill_polygon(&points, color);
        }
        "network" => {
            // Wifi fan: three arcs over a dot.
            let cx = x + half;
            for (i, r) in [6u16, 4, 2].into_iter().enumerate() {
                let cy = y + 2 + (i as u16) * 2 + r;
                ctx.stroke_arc((cx, cy), r, 220.0, 320.0, 1, color);
            }
            ctx.draw_ellipse(
                Rect::new(cx.saturating_sub(1), y + s - 4, 2, 2),
                Some(color),
                None,
                1,
            );
        }
        "home" => {
            let peak = (x + half, y + 1);
            ctx.draw_line(
                &[peak, (x + 1, y + half), (x + s - 1, y + half), peak],
                1,
                color,
            );
            ctx.stroke_rounded_rect(
                Rect::new(x + 3, y + half, s - 6, (s - half).saturating_sub(1)),
                0,
                1,
                color,
            );
        }
        "sun" => {
            let (cx, cy) = (x + half, y + half);
            let r = quarter;
            ctx.stroke_arc((cx, cy), r, 0.0, 360.0, 1, color);
            for angle in (0..360).step_by(45) {
                let rad = (angle as f32).to_radians();
                let p1 = offset(cx, cy, r + 2, rad);
                let p2 = offset(cx, cy, r + 4, rad);
                ctx.draw_line(&[p1, p2], 1, color);
            }
        }
        "drop" => {
            let cx = x + half;
            ctx.draw_line(
                &[(cx, y + 1), (x + 2, y + s - 4), (x + s - 2, y + s - 4)],
                1,
                color,
            );
            ctx.stroke_arc((cx, y + s - 4), (s - 4) / 2, 0.0, 180.0, 1, color);
        }
        "moon" => {
            let (cx, cy) = (x + half, y + half);
            ctx.stroke_arc((cx, cy), half - 1, 60.0, 390.0, 1, color);
            ctx.stroke_arc((cx + quarter / 2, cy.saturating_sub(quarter / 2)), half - 2, 120.0, 210.0, 1, color);
        }
        "cloud" => {
            ctx.draw_ellipse(
                Rect::new(x + 1, y + half.saturating_sub(1), s - 2, half),
                Some(color),
                None,
                1,
            );
            ctx.draw_ellipse(
                Rect::new(x + quarter, y + quarter.saturating_sub(1), half, half),
                Some(color),
                None,
                1,
            );
        }
        "rain" => {
            draw(ctx, "cloud", (x, y), (s * 3) / 4, color);
            for i in 0..3u16 {
                let rx = x + quarter + i * quarter;
                ctx.draw_line(&[(rx, y + s - quarter), (rx.saturating_sub(1), y + s - 1)], 1, color);
            }
        }
        "wind" => {
            for i in 0..3u16 {
                let ly = y + quarter + i * quarter;
                let end = x + s - 2 - i * 2;
                ctx.draw_line(&[(x + 1, ly), (end, ly)], 1, color);
                ctx.stroke_arc((end, ly.saturating_sub(1)), 2, 90.0, 300.0, 1, color);
            }
        }
        "lock" => {
            ctx.stroke_arc((x + half, y + quarter + 1), quarter, 180.0, 360.0, 1, color);
            ctx.fill_rounded_rect(
                Rect::new(x + quarter, y + quarter + 1, s - 2 * quarter, s - quarter - 2),
                1,
                color,
            );
        }
        "music" => {
            let stem_x = x + half + quarter;
            ctx.draw_ellipse(
                Rect::new(x + quarter.saturating_sub(1), y + s - quarter - 2, quarter + 2, quarter + 1),
                Some(color),
                None,
                1,
            );
            ctx.draw_line(&[(stem_x, y + 2), (stem_x, y + s - quarter)], 1, color);
            ctx.draw_line(&[(stem_x, y + 2), (x + s - 1, y + quarter)], 1, color);
        }
        other => {
            tracing::debug!(icon = other, "unknown icon name, drawing nothing");
        }
    }
}

/// Point at polar offset from a center, rounded to logical pixels.
fn offset(cx: u16, cy: u16, r: u16, rad: f32) -> (u16, u16) {
    let x = cx as f32 + r as f32 * rad.cos();
    let y = cy as f32 + r as f32 * rad.sin();
    (x.round().max(0.0) as u16, y.round().max(0.0) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontLibrary;
    use glimpse_core::Size;
    use glimpse_style::Theme;

    #[test]
    fn every_known_icon_draws_something() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        for name in ICON_NAMES {
            let mut ctx = RenderContext::new(Size::new(40, 40), &theme, &fonts);
            ctx.draw_icon(name, (8, 8), 16, Rgb::WHITE);
            let img = ctx.finish();
            let lit = img.pixels().filter(|p| p.0[0] > 30).count();
            assert!(lit > 0, "icon '{name}' drew nothing");
        }
    }

    #[test]
    fn unknown_icon_is_a_no_op() {
        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(40, 40), &theme, &fonts);
        ctx.draw_icon("no_such_icon", (8, 8), 16, Rgb::WHITE);
        let img = ctx.finish();
        assert_eq!(img.pixels().filter(|p| p.0[0] > 30).count(), 0);
    }
}
