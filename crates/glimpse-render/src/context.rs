#![forbid(unsafe_code)]

//! The per-cycle render context.
//!
//! Widgets and the rich-text engine target this API exclusively. All
//! coordinates are logical pixels; the context multiplies by the
//! supersampling factor at buffer-write time and downsamples once, in
//! [`RenderContext::finish`].

use std::num::NonZeroUsize;

use glimpse_core::config::{Align, FontTier};
use glimpse_core::{Rect, Rgb, Size};
use glimpse_style::Theme;
use lru::LruCache;
use rustc_hash::FxBuildHasher;

use crate::canvas::{Canvas, ClipRect};
use crate::fonts::FontLibrary;
use crate::icons;

/// Default supersampling factor: logical 240×240 renders at 480×480.
pub const SUPERSAMPLE: u16 = 2;

/// Measured-text cache entries kept per context.
const MEASURE_CACHE_CAP: usize = 1024;

/// Vertical anchor for text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Where a text position lands relative to the rendered run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub h: Align,
    pub v: VAlign,
}

impl Anchor {
    pub const TOP_LEFT: Self = Self {
        h: Align::Start,
        v: VAlign::Top,
    };
    pub const TOP_CENTER: Self = Self {
        h: Align::Center,
        v: VAlign::Top,
    };
    pub const MID_LEFT: Self = Self {
        h: Align::Start,
        v: VAlign::Middle,
    };
    pub const CENTER: Self = Self {
        h: Align::Center,
        v: VAlign::Middle,
    };
    pub const MID_RIGHT: Self = Self {
        h: Align::End,
        v: VAlign::Middle,
    };
    pub const BOTTOM_CENTER: Self = Self {
        h: Align::Center,
        v: VAlign::Bottom,
    };
}

type MeasureKey = (String, FontTier, bool);

/// Mutable per-render-cycle state: the pixel buffer, active theme,
/// font access, and the supersampling ratio.
///
/// Exclusively owned by one render cycle; never shared.
pub struct RenderContext<'a> {
    canvas: Canvas,
    theme: &'a Theme,
    fonts: &'a FontLibrary,
    scale: u16,
    logical: Size,
    measure_cache: LruCache<MeasureKey, (u32, u32), FxBuildHasher>,
}

impl<'a> RenderContext<'a> {
    /// Create a context for a logical canvas at the default
    /// supersampling factor, cleared to the theme background.
    #[must_use]
    pub fn new(logical: Size, theme: &'a Theme, fonts: &'a FontLibrary) -> Self {
        Self::with_scale(logical, SUPERSAMPLE, theme, fonts)
    }

    /// Create a context with an explicit supersampling factor (≥ 1).
    #[must_use]
    pub fn with_scale(logical: Size, scale: u16, theme: &'a Theme, fonts: &'a FontLibrary) -> Self {
        let scale = scale.max(1);
        let canvas = Canvas::new(
            logical.width as u32 * scale as u32,
            logical.height as u32 * scale as u32,
            theme.background,
        );
        Self {
            canvas,
            theme,
            fonts,
            scale,
            logical,
            measure_cache: LruCache::with_hasher(
                NonZeroUsize::new(MEASURE_CACHE_CAP).expect("cache capacity is nonzero"),
                FxBuildHasher,
            ),
        }
    }

    /// Logical canvas size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.logical
    }

    /// The active theme.
    #[must_use]
    pub const fn theme(&self) -> &'a Theme {
        self.theme
    }

    /// Supersampling factor.
    #[must_use]
    pub const fn scale(&self) -> u16 {
        self.scale
    }

    /// Scale a logical coordinate to physical pixels.
    #[inline]
    fn s(&self, v: u16) -> f32 {
        v as f32 * self.scale as f32
    }

    /// Restrict all drawing to a logical rectangle (None clears).
    pub fn set_clip(&mut self, rect: Option<Rect>) {
        self.canvas.set_clip(rect.map(|r| ClipRect {
            x1: (r.x as i32) * self.scale as i32,
            y1: (r.y as i32) * self.scale as i32,
            x2: (r.right() as i32) * self.scale as i32,
            y2: (r.bottom() as i32) * self.scale as i32,
        }));
    }

    // --- text ---

    /// Physical pixel size for a tier.
    #[inline]
    fn tier_px(&self, tier: FontTier) -> f32 {
        tier.px() as f32 * self.scale as f32
    }

    /// Measure a text run: (width, line height) in logical pixels.
    ///
    /// Logical sizes are the physical measurement rounded up, so a run
    /// drawn at physical scale never exceeds its measured extent.
    pub fn measure_text(&mut self, text: &str, tier: FontTier, bold: bool) -> (u32, u32) {
        let key = (text.to_string(), tier, bold);
        if let Some(&cached) = self.measure_cache.get(&key) {
            return cached;
        }
        let px = self.tier_px(tier);
        let width = self.fonts.line_width(text, px, bold);
        let (_, _, line) = self.fonts.vertical_metrics(px, bold);
        let scale = self.scale as f32;
        let measured = (
            (width / scale).ceil() as u32,
            (line / scale).ceil() as u32,
        );
        self.measure_cache.put(key, measured);
        measured
    }

    /// Line height for a tier in logical pixels.
    pub fn line_height(&mut self, tier: FontTier, bold: bool) -> u32 {
        let (_, _, line) = self.fonts.vertical_metrics(self.tier_px(tier), bold);
        (line / self.scale as f32).ceil() as u32
    }

    /// Draw a text run anchored at a logical position.
    pub fn draw_text(
        &mut self,
        text: &str,
        position: (u16, u16),
        tier: FontTier,
        bold: bool,
        color: Rgb,
        anchor: Anchor,
    ) {
        let px = self.tier_px(tier);
        let run_width = self.fonts.line_width(text, px, bold);
        let (ascent, descent, _) = self.fonts.vertical_metrics(px, bold);
        let run_height = ascent - descent;

        let x0 = match anchor.h {
            Align::Start => self.s(position.0),
            Align::Center => self.s(position.0) - run_width / 2.0,
            Align::End => self.s(position.0) - run_width,
        };
        let top = match anchor.v {
            VAlign::Top => self.s(position.1),
            VAlign::Middle => self.s(position.1) - run_height / 2.0,
            VAlign::Bottom => self.s(position.1) - run_height,
        };
        self.draw_glyph_run(text, x0, top + ascent, px, bold, color);
    }

    fn draw_glyph_run(
        &mut self,
        text: &str,
        origin_x: f32,
        baseline_y: f32,
        px: f32,
        bold: bool,
        color: Rgb,
    ) {
        let face = self.fonts.face(bold);
        let mut pen_x = origin_x;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(prev) = prev
                && let Some(kern) = face.horizontal_kern(prev, ch, px)
            {
                pen_x += kern;
            }
            let (metrics, bitmap) = face.rasterize(ch, px);
            if metrics.width > 0 && metrics.height > 0 {
                let glyph_x = pen_x + metrics.xmin as f32;
                let glyph_y = baseline_y - (metrics.height as i32 + metrics.ymin) as f32;
                for row in 0..metrics.height {
                    for col in 0..metrics.width {
                        let coverage = bitmap[row * metrics.width + col] as f32 / 255.0;
                        if coverage > 0.0 {
                            self.canvas.blend(
                                (glyph_x + col as f32) as i32,
                                (glyph_y + row as f32) as i32,
                                color,
                                coverage,
                            );
                        }
                    }
                }
            }
            pen_x += metrics.advance_width;
            prev = Some(ch);
        }
    }

    // --- shapes ---

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.canvas.fill_rect(
            self.s(rect.x),
            self.s(rect.y),
            self.s(rect.width),
            self.s(rect.height),
            color,
        );
    }

    /// Fill a rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: u16, color: Rgb) {
        self.canvas.fill_rounded_rect(
            self.s(rect.x),
            self.s(rect.y),
            self.s(rect.width),
            self.s(rect.height),
            self.s(radius),
            color,
        );
    }

    /// Stroke a rounded rectangle outline.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: u16, width: u16, color: Rgb) {
        self.canvas.stroke_rounded_rect(
            self.s(rect.x),
            self.s(rect.y),
            self.s(rect.width),
            self.s(rect.height),
            self.s(radius),
            self.s(width.max(1)),
            color,
        );
    }

    /// Fill or stroke an ellipse inscribed in `rect`.
    pub fn draw_ellipse(&mut self, rect: Rect, fill: Option<Rgb>, outline: Option<Rgb>, width: u16) {
        let (x, y) = (self.s(rect.x), self.s(rect.y));
        let (w, h) = (self.s(rect.width), self.s(rect.height));
        if let Some(color) = fill {
            self.canvas.fill_ellipse(x, y, w, h, color);
        }
        if let Some(color) = outline {
            self.canvas.stroke_ellipse(x, y, w, h, self.s(width.max(1)), color);
        }
    }

    /// Stroke a polyline through logical points.
    pub fn draw_line(&mut self, points: &[(u16, u16)], width: u16, color: Rgb) {
        let physical: Vec<(f32, f32)> = points
            .iter()
            .map(|&(x, y)| (self.s(x), self.s(y)))
            .collect();
        self.canvas
            .stroke_polyline(&physical, self.s(width.max(1)), color, false);
    }

    /// Draw a widget panel background per the active theme: fill,
    /// border, and the neon glow halo when the theme asks for it.
    pub fn draw_panel(&mut self, rect: Rect) {
        use glimpse_style::BorderStyle;

        let radius = self.theme.corner_radius;
        if self.theme.border_style != BorderStyle::Outline {
            self.fill_rounded_rect(rect, radius, self.theme.panel_fill);
        }
        if self.theme.border_width > 0 && self.theme.border_style != BorderStyle::None {
            if self.theme.glow_effect {
                for i in 1..=3u16 {
                    let halo = Rect::new(
                        rect.x.saturating_sub(i),
                        rect.y.saturating_sub(i),
                        rect.width + i * 2,
                        rect.height + i * 2,
                    );
                    let color = self.theme.panel_border.dim(0.4 - 0.1 * i as f32);
                    self.stroke_rounded_rect(halo, radius + i, 1, color);
                }
            }
            self.stroke_rounded_rect(rect, radius, self.theme.border_width, self.theme.panel_border);
        }
    }

    /// Horizontal progress bar, 0-100 percent.
    pub fn draw_bar(&mut self, rect: Rect, percent: f32, color: Rgb, background: Rgb) {
        let pct = percent.clamp(0.0, 100.0);
        let fill_width = (rect.width as f32 * pct / 100.0) as u16;
        if self.theme.invert_bars {
            // Outline-only rendition: frame plus filled portion.
            self.stroke_rounded_rect(rect, 2, 1, background);
        } else {
            self.fill_rounded_rect(rect, 2, background);
        }
        if fill_width > 0 {
            let fill = Rect::new(rect.x, rect.y, fill_width, rect.height);
            self.fill_rounded_rect(fill, 2, color);
        }
    }

    /// Horizontal bar split into colored segments; percentages should
    /// sum to at most 100.
    pub fn draw_segmented_bar(&mut self, rect: Rect, segments: &[(f32, Rgb)], background: Rgb) {
        self.fill_rounded_rect(rect, 2, background);
        let mut cursor = rect.x;
        for &(percent, color) in segments {
            let width = (rect.width as f32 * percent.clamp(0.0, 100.0) / 100.0) as u16;
            if width == 0 || cursor >= rect.right() {
                continue;
            }
            let clamped = width.min(rect.right() - cursor);
            self.fill_rect(Rect::new(cursor, rect.y, clamped, rect.height), color);
            cursor += clamped;
        }
    }

    /// Mini bar chart: most recent value on the right.
    pub fn draw_mini_bars(&mut self, rect: Rect, data: &[f64], color: Rgb) {
        const BAR_WIDTH: u16 = 3;
        const GAP: u16 = 1;
        if data.is_empty() || rect.is_empty() {
            return;
        }
        let (min_val, max_val) = series_range(data);
        let range = if max_val > min_val { max_val - min_val } else { 1.0 };
        let capacity = (rect.width / (BAR_WIDTH + GAP)) as usize;
        let visible = &data[data.len().saturating_sub(capacity)..];
        for (i, &value) in visible.iter().rev().enumerate() {
            let bar_right = rect.right() as i32 - (i as i32 + 1) * (BAR_WIDTH + GAP) as i32;
            if bar_right < rect.x as i32 {
                break;
            }
            let norm = ((value - min_val) / range) as f32;
            let bar_height =
                (((rect.height as f32) * 0.9 * norm) as u16).max(2).min(rect.height);
            self.fill_rect(
                Rect::new(
                    bar_right as u16,
                    rect.bottom() - bar_height,
                    BAR_WIDTH,
                    bar_height,
                ),
                color,
            );
        }
    }

    /// Sparkline with optional Catmull-Rom smoothing and a dimmed area
    /// fill under the curve.
    pub fn draw_sparkline(&mut self, rect: Rect, data: &[f64], color: Rgb, fill: bool, smooth: bool) {
        if data.len() < 2 || rect.is_empty() {
            return;
        }
        let (min_val, max_val) = series_range(data);
        let range = if max_val > min_val { max_val - min_val } else { 1.0 };

        let (x, y) = (self.s(rect.x), self.s(rect.y));
        let (w, h) = (self.s(rect.width), self.s(rect.height));
        let control: Vec<(f32, f32)> = data
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let px = x + (i as f32 / (data.len() - 1) as f32) * w;
                let py = y + h - (((value - min_val) / range) as f32) * h;
                (px, py)
            })
            .collect();

        let points = if smooth && control.len() >= 3 {
            let samples = ((w / 2.0) as usize).max(50);
            catmull_rom(&control, samples)
        } else {
            control
        };

        if fill {
            let fill_color = color.dim(0.25);
            let bottom = y + h;
            for pair in points.windows(2) {
                let (x0, y0) = pair[0];
                let (x1, y1) = pair[1];
                let top = (y0 + y1) / 2.0;
                if x1 > x0 && bottom > top {
                    self.canvas.fill_rect(x0, top, x1 - x0, bottom - top, fill_color);
                }
            }
        }

        self.canvas
            .stroke_polyline(&points, 2.0 * self.scale as f32, color, false);
    }

    /// 270° arc gauge sweeping clockwise from the lower-left (135°).
    pub fn draw_arc_gauge(&mut self, rect: Rect, percent: f32, color: Rgb, background: Rgb, width: u16) {
        let cx = (self.s(rect.x) + self.s(rect.right())) / 2.0;
        let cy = (self.s(rect.y) + self.s(rect.bottom())) / 2.0;
        let radius = self.s(rect.width) / 2.0 - self.s(width) / 2.0;
        let stroke = self.s(width.max(1));
        self.canvas.stroke_arc(cx, cy, radius, 135.0, 405.0, stroke, background);
        let pct = percent.clamp(0.0, 100.0);
        if pct > 0.0 {
            let end = 135.0 + pct / 100.0 * 270.0;
            self.canvas.stroke_arc(cx, cy, radius, 135.0, end, stroke, color);
        }
    }

    /// Full-circle ring gauge starting at twelve o'clock.
    pub fn draw_ring_gauge(
        &mut self,
        center: (u16, u16),
        radius: u16,
        percent: f32,
        color: Rgb,
        background: Rgb,
        width: u16,
    ) {
        let (cx, cy) = (self.s(center.0), self.s(center.1));
        let r = self.s(radius);
        let stroke = self.s(width.max(1));
        self.canvas.stroke_arc(cx, cy, r, 0.0, 360.0, stroke, background);
        let pct = percent.clamp(0.0, 100.0);
        if pct > 0.0 {
            let end = -90.0 + pct / 100.0 * 360.0;
            self.canvas.stroke_arc(cx, cy, r, -90.0, end, stroke, color);
        }
    }

    /// Stroke a circular arc around a logical center. Angles in
    /// degrees, clockwise from the positive x axis.
    pub fn stroke_arc(
        &mut self,
        center: (u16, u16),
        radius: u16,
        start_deg: f32,
        end_deg: f32,
        width: u16,
        color: Rgb,
    ) {
        self.canvas.stroke_arc(
            self.s(center.0),
            self.s(center.1),
            self.s(radius),
            start_deg,
            end_deg,
            self.s(width.max(1)),
            color,
        );
    }

    /// Fill a simple polygon given in logical coordinates.
    pub fn fill_polygon(&mut self, points: &[(u16, u16)], color: Rgb) {
        let physical: Vec<(f32, f32)> = points
            .iter()
            .map(|&(x, y)| (self.s(x), self.s(y)))
            .collect();
        self.canvas.fill_polygon(&physical, color);
    }

    /// Draw a built-in geometric icon with its top-left at `position`.
    pub fn draw_icon(&mut self, name: &str, position: (u16, u16), size: u16, color: Rgb) {
        icons::draw(self, name, position, size, color);
    }

    /// Copy a raw RGB frame into a logical rectangle, nearest-neighbor
    /// scaled. Used by the camera widget.
    pub fn blit_frame(&mut self, rect: Rect, width: u16, height: u16, pixels: &[u8]) {
        if width == 0 || height == 0 || rect.is_empty() {
            return;
        }
        if pixels.len() < width as usize * height as usize * 3 {
            tracing::warn!("frame buffer shorter than its declared size, skipping");
            return;
        }
        let dst_w = self.s(rect.width) as i32;
        let dst_h = self.s(rect.height) as i32;
        let x0 = self.s(rect.x) as i32;
        let y0 = self.s(rect.y) as i32;
        for dy in 0..dst_h {
            let sy = (dy as u32 * height as u32 / dst_h as u32).min(height as u32 - 1);
            for dx in 0..dst_w {
                let sx = (dx as u32 * width as u32 / dst_w as u32).min(width as u32 - 1);
                let i = ((sy * width as u32 + sx) * 3) as usize;
                self.canvas.blend(
                    x0 + dx,
                    y0 + dy,
                    Rgb::new(pixels[i], pixels[i + 1], pixels[i + 2]),
                    1.0,
                );
            }
        }
    }

    /// Direct canvas access for the icon rasterizer.
    pub(crate) fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Finish the cycle: downsample to logical resolution and apply
    /// theme post effects. Consumes the context.
    #[must_use]
    pub fn finish(self) -> image::RgbImage {
        let scale = self.scale as u32;
        let (lw, lh) = (self.logical.width as u32, self.logical.height as u32);
        let src = self.canvas.pixels();
        let src_w = lw * scale;
        let mut out = image::RgbImage::new(lw, lh);
        let samples = (scale * scale) as u32;
        for y in 0..lh {
            for x in 0..lw {
                let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
                for sy in 0..scale {
                    for sx in 0..scale {
                        let i = (((y * scale + sy) * src_w + x * scale + sx) * 3) as usize;
                        r += src[i] as u32;
                        g += src[i + 1] as u32;
                        b += src[i + 2] as u32;
                    }
                }
                out.put_pixel(
                    x,
                    y,
                    image::Rgb([(r / samples) as u8, (g / samples) as u8, (b / samples) as u8]),
                );
            }
        }

        if self.theme.scanlines {
            for y in (1..lh).step_by(2) {
                for x in 0..lw {
                    let px = out.get_pixel_mut(x, y);
                    px.0 = [
                        (px.0[0] as f32 * 0.75) as u8,
                        (px.0[1] as f32 * 0.75) as u8,
                        (px.0[2] as f32 * 0.75) as u8,
                    ];
                }
            }
        }
        out
    }
}

/// (min, max) of a series, ignoring NaNs.
fn series_range(data: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in data {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

/// Catmull-Rom spline through the control points.
fn catmull_rom(points: &[(f32, f32)], num_points: usize) -> Vec<(f32, f32)> {
    if points.len() < 3 {
        return points.to_vec();
    }
    // Phantom endpoints repeat the boundary control points.
    let mut pts = Vec::with_capacity(points.len() + 2);
    pts.push(points[0]);
    pts.extend_from_slice(points);
    pts.push(points[points.len() - 1]);

    let segments = pts.len() - 3;
    let per_segment = (num_points / segments).max(1);
    let mut out = Vec::with_capacity(segments * per_segment + 1);
    for i in 0..segments {
        let (p0, p1, p2, p3) = (pts[i], pts[i + 1], pts[i + 2], pts[i + 3]);
        for j in 0..per_segment {
            let t = j as f32 / per_segment as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            let interp = |a: f32, b: f32, c: f32, d: f32| {
                0.5 * (2.0 * b
                    + (-a + c) * t
                    + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
                    + (-a + 3.0 * b - 3.0 * c + d) * t3)
            };
            out.push((interp(p0.0, p1.0, p2.0, p3.0), interp(p0.1, p1.1, p2.1, p3.1)));
        }
    }
    out.push(pts[pts.len() - 2]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::Size;

    fn test_fonts() -> Option<FontLibrary> {
        FontLibrary::load_or_skip()
    }

    #[test]
    fn finish_downsamples_to_logical_size() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let img = ctx.finish();
        assert_eq!(img.dimensions(), (240, 240));
    }

    #[test]
    fn background_matches_theme() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::soft();
        let ctx = RenderContext::new(Size::new(32, 32), &theme, &fonts);
        let img = ctx.finish();
        let px = img.get_pixel(16, 16);
        assert_eq!(px.0, [15, 15, 20]);
    }

    #[test]
    fn measure_is_cached_and_stable() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let a = ctx.measure_text("22°C", FontTier::Large, true);
        let b = ctx.measure_text("22°C", FontTier::Large, true);
        assert_eq!(a, b);
        assert!(a.0 > 0 && a.1 > 0);
    }

    #[test]
    fn bold_is_at_least_as_wide() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(240, 240), &theme, &fonts);
        let regular = ctx.measure_text("Sample", FontTier::Regular, false);
        let bold = ctx.measure_text("Sample", FontTier::Regular, true);
        assert!(bold.0 >= regular.0);
    }

    #[test]
    fn draw_text_marks_pixels() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(64, 64), &theme, &fonts);
        ctx.draw_text("X", (32, 32), FontTier::Huge, true, Rgb::WHITE, Anchor::CENTER);
        let img = ctx.finish();
        let lit = img.pixels().filter(|p| p.0[0] > 100).count();
        assert!(lit > 0, "text should rasterize some pixels");
    }

    #[test]
    fn clip_keeps_drawing_inside_slot() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(64, 64), &theme, &fonts);
        ctx.set_clip(Some(Rect::new(0, 0, 32, 64)));
        ctx.fill_rect(Rect::new(0, 0, 64, 64), Rgb::WHITE);
        let img = ctx.finish();
        assert_eq!(img.get_pixel(10, 10).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(40, 10).0, [0, 0, 0]);
    }

    #[test]
    fn bar_fills_proportionally() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(100, 20), &theme, &fonts);
        ctx.draw_bar(
            Rect::new(0, 5, 100, 10),
            50.0,
            Rgb::new(255, 0, 0),
            Rgb::new(40, 40, 40),
        );
        let img = ctx.finish();
        assert!(img.get_pixel(25, 10).0[0] > 200, "left half is filled");
        assert!(img.get_pixel(75, 10).0[0] < 100, "right half is background");
    }

    #[test]
    fn segmented_bar_lays_segments_left_to_right() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(100, 20), &theme, &fonts);
        ctx.draw_segmented_bar(
            Rect::new(0, 5, 100, 10),
            &[(30.0, Rgb::new(255, 0, 0)), (30.0, Rgb::new(0, 0, 255))],
            Rgb::new(40, 40, 40),
        );
        let img = ctx.finish();
        assert!(img.get_pixel(15, 10).0[0] > 200, "first segment is red");
        assert!(img.get_pixel(45, 10).0[2] > 200, "second segment is blue");
        let tail = img.get_pixel(90, 10).0;
        assert!(tail[0] < 100 && tail[2] < 100, "tail is background");
    }

    #[test]
    fn mini_bars_fill_from_the_right() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(60, 30), &theme, &fonts);
        ctx.draw_mini_bars(
            Rect::new(0, 0, 60, 30),
            &[1.0, 5.0, 3.0, 9.0],
            Rgb::new(0, 255, 0),
        );
        let img = ctx.finish();
        // The most recent (tallest) bar sits at the right edge.
        assert!(img.get_pixel(57, 15).0[1] > 150);
        assert_eq!(img.get_pixel(2, 15).0, [0, 0, 0], "left edge stays empty");
    }

    #[test]
    fn catmull_rom_passes_near_endpoints() {
        let control = vec![(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)];
        let smooth = catmull_rom(&control, 50);
        assert!(smooth.len() >= 50);
        let first = smooth.first().unwrap();
        let last = smooth.last().unwrap();
        assert!((first.0 - 0.0).abs() < 0.01 && (first.1 - 0.0).abs() < 0.01);
        assert!((last.0 - 20.0).abs() < 0.01 && (last.1 - 0.0).abs() < 0.01);
    }

    #[test]
    fn series_range_ignores_nan() {
        assert_eq!(series_range(&[1.0, f64::NAN, 3.0]), (1.0, 3.0));
        assert_eq!(series_range(&[f64::NAN]), (0.0, 1.0));
    }

    #[test]
    fn sparkline_and_gauges_render_without_fonts_involved() {
        let Some(fonts) = test_fonts() else { return };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(120, 120), &theme, &fonts);
        ctx.draw_sparkline(
            Rect::new(10, 10, 100, 40),
            &[1.0, 3.0, 2.0, 5.0, 4.0],
            Rgb::new(0, 212, 255),
            true,
            true,
        );
        ctx.draw_arc_gauge(Rect::new(10, 60, 50, 50), 65.0, Rgb::WHITE, Rgb::new(60, 60, 60), 6);
        ctx.draw_ring_gauge((90, 85), 20, 40.0, Rgb::WHITE, Rgb::new(60, 60, 60), 4);
        let img = ctx.finish();
        assert!(img.pixels().any(|p| p.0[2] > 150), "sparkline drew cyan");
    }
}
