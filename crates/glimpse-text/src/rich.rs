#![forbid(unsafe_code)]

//! Laying out and drawing wrapped rich text.
//!
//! Lines are wrapped to the target rectangle, truncated with an
//! ellipsis when they cannot fit, and drawn left-to-right with the
//! requested alignment. Span colors resolve against the active theme
//! at draw time: inherit means primary text, emphasis means secondary.

use glimpse_core::Rect;
use glimpse_core::config::Align;
use glimpse_render::{RenderContext, VAlign};
use unicode_segmentation::UnicodeSegmentation;

use crate::markup::{SpanColor, SpanStyle, TextSpan, parse_markup};
use crate::wrap::{Line, TextMeasure, wrap_spans};

const ELLIPSIS: &str = "…";

impl TextMeasure for RenderContext<'_> {
    fn span_size(&mut self, text: &str, style: &SpanStyle) -> (u32, u32) {
        self.measure_text(text, style.tier_or_default(), style.bold)
    }
}

/// Parsed rich text, ready to measure and draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RichText {
    spans: Vec<TextSpan>,
}

impl RichText {
    /// Parse markup with a base style.
    #[must_use]
    pub fn parse(input: &str, base: SpanStyle) -> Self {
        Self {
            spans: parse_markup(input, base),
        }
    }

    /// Wrap pre-built spans.
    #[must_use]
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// The parsed span sequence.
    #[must_use]
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    /// Preferred (width, height) when wrapped to `max_width`.
    pub fn measure(&self, measure: &mut impl TextMeasure, max_width: u32) -> (u32, u32) {
        let lines = wrap_spans(&self.spans, max_width, measure);
        let width = lines.iter().map(|l| l.width).max().unwrap_or(0);
        let height = lines.iter().map(|l| l.height).sum();
        (width.min(max_width), height)
    }

    /// Wrap and draw into `rect`. Content that cannot fit is truncated
    /// with an ellipsis; nothing draws outside the rectangle.
    pub fn draw(&self, ctx: &mut RenderContext<'_>, rect: Rect, align: Align, valign: VAlign) {
        if rect.is_empty() {
            return;
        }
        let mut lines = wrap_spans(&self.spans, rect.width as u32, ctx);

        // Vertical truncation: keep whole lines that fit.
        let mut used = 0u32;
        let mut visible = 0usize;
        for line in &lines {
            if used + line.height > rect.height as u32 && visible > 0 {
                break;
            }
            used += line.height;
            visible += 1;
            if used >= rect.height as u32 {
                break;
            }
        }
        let truncated_vertically = visible < lines.len();
        lines.truncate(visible.max(1));

        if truncated_vertically
            && let Some(last) = lines.last_mut()
        {
            truncate_with_ellipsis(last, rect.width as u32, ctx);
        }
        // A lone over-wide word still may not escape the slot.
        for line in &mut lines {
            if line.width > rect.width as u32 {
                truncate_with_ellipsis(line, rect.width as u32, ctx);
            }
        }

        let total: u32 = lines.iter().map(|l| l.height).sum();
        let mut y = match valign {
            VAlign::Top => rect.y as u32,
            VAlign::Middle => {
                rect.y as u32 + (rect.height as u32).saturating_sub(total) / 2
            }
            VAlign::Bottom => rect.y as u32 + (rect.height as u32).saturating_sub(total),
        };

        let theme = ctx.theme();
        for line in &lines {
            let x = match align {
                Align::Start => rect.x as u32,
                Align::Center => {
                    rect.x as u32 + (rect.width as u32).saturating_sub(line.width) / 2
                }
                Align::End => rect.x as u32 + (rect.width as u32).saturating_sub(line.width),
            };
            let mut cursor = x;
            for fragment in &line.fragments {
                let color = match fragment.style.color {
                    SpanColor::Inherit => theme.text_primary,
                    SpanColor::Secondary => theme.text_secondary,
                    SpanColor::Fixed(c) => c,
                };
                ctx.draw_text(
                    &fragment.text,
                    (cursor.min(u16::MAX as u32) as u16, y.min(u16::MAX as u32) as u16),
                    fragment.style.tier_or_default(),
                    fragment.style.bold,
                    color,
                    glimpse_render::Anchor::TOP_LEFT,
                );
                cursor += fragment.width;
            }
            y += line.height;
        }
    }
}

/// Shorten a line until it plus the ellipsis fits `max_width`.
fn truncate_with_ellipsis(line: &mut Line, max_width: u32, measure: &mut impl TextMeasure) {
    let style = line
        .fragments
        .last()
        .map(|f| f.style)
        .unwrap_or_default();
    let (ellipsis_width, _) = measure.span_size(ELLIPSIS, &style);

    while line.width + ellipsis_width > max_width {
        let Some(last) = line.fragments.last_mut() else {
            break;
        };
        let Some(grapheme) = last.text.graphemes(true).next_back() else {
            line.fragments.pop();
            continue;
        };
        let new_len = last.text.len() - grapheme.len();
        last.text.truncate(new_len);
        let (w, _) = measure.span_size(&last.text, &last.style);
        line.width = line.width - last.width + w;
        last.width = w;
        if last.text.is_empty() {
            line.fragments.pop();
        }
    }

    let style = line.fragments.last().map(|f| f.style).unwrap_or(style);
    let (w, h) = measure.span_size(ELLIPSIS, &style);
    line.width += w;
    line.height = line.height.max(h);
    match line.fragments.last_mut() {
        Some(last) if last.style == style => {
            last.text.push_str(ELLIPSIS);
            last.width += w;
        }
        _ => line.fragments.push(crate::wrap::LineFragment {
            text: ELLIPSIS.to_string(),
            style,
            width: w,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::SpanStyle;
    use crate::wrap::wrap_spans;

    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn span_size(&mut self, text: &str, _style: &SpanStyle) -> (u32, u32) {
            (text.chars().count() as u32 * 10, 10)
        }
    }

    #[test]
    fn measure_reports_widest_line_and_total_height() {
        let rich = RichText::parse("aaa\nbbbbb", SpanStyle::plain());
        let (w, h) = rich.measure(&mut FixedMeasure, 1000);
        assert_eq!(w, 50);
        assert_eq!(h, 20);
    }

    #[test]
    fn measure_clamps_width_to_limit() {
        let rich = RichText::parse("incomprehensibilities", SpanStyle::plain());
        let (w, _) = rich.measure(&mut FixedMeasure, 100);
        assert_eq!(w, 100);
    }

    #[test]
    fn ellipsis_truncation_respects_width() {
        let spans = RichText::parse("abcdefghij", SpanStyle::plain()).spans.clone();
        let mut lines = wrap_spans(&spans, 1000, &mut FixedMeasure);
        truncate_with_ellipsis(&mut lines[0], 50, &mut FixedMeasure);
        assert_eq!(lines[0].text(), "abcd…");
        assert_eq!(lines[0].width, 50);
    }

    #[test]
    fn ellipsis_on_empty_budget_is_just_the_ellipsis() {
        let spans = RichText::parse("abc", SpanStyle::plain()).spans.clone();
        let mut lines = wrap_spans(&spans, 1000, &mut FixedMeasure);
        truncate_with_ellipsis(&mut lines[0], 10, &mut FixedMeasure);
        assert_eq!(lines[0].text(), ELLIPSIS);
    }

    #[test]
    fn draw_stays_inside_rect_with_real_fonts() {
        use glimpse_core::Size;
        use glimpse_render::FontLibrary;
        use glimpse_style::Theme;

        let Some(fonts) = FontLibrary::load_or_skip() else {
            return;
        };
        let theme = Theme::classic();
        let mut ctx = RenderContext::new(Size::new(100, 100), &theme, &fonts);
        ctx.set_clip(Some(Rect::new(10, 10, 60, 40)));
        let rich = RichText::parse(
            "a fairly long **styled** label that must wrap and truncate",
            SpanStyle::plain(),
        );
        rich.draw(&mut ctx, Rect::new(10, 10, 60, 40), Align::Start, VAlign::Top);
        let img = ctx.finish();
        // Nothing outside the clip rect is lit.
        for (x, y, px) in img.enumerate_pixels() {
            let inside = (10..70).contains(&x) && (10..50).contains(&y);
            if !inside {
                assert_eq!(px.0, [0, 0, 0], "pixel outside slot at ({x},{y})");
            }
        }
    }
}
