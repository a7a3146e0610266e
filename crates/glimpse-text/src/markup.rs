#![forbid(unsafe_code)]

//! Markup parsing into styled spans.
//!
//! Single pass, no error path: an unmatched or unterminated marker
//! degrades to literal text, and markers nested inside an open style
//! are stripped, flattening the run to the outermost style. The
//! invariant the rest of the engine relies on: concatenating all
//! spans' text in order reproduces the input with markup characters
//! removed.

use glimpse_core::Rgb;
use glimpse_core::config::FontTier;

/// Span color resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanColor {
    /// Use the theme's primary text color.
    #[default]
    Inherit,
    /// Use the theme's secondary text color (emphasis).
    Secondary,
    /// An explicit color.
    Fixed(Rgb),
}

/// Resolved style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    /// Bold face.
    pub bold: bool,
    /// Color, or inherit from the theme.
    pub color: SpanColor,
    /// Size tier; `None` inherits the widget's base tier.
    pub tier: Option<FontTier>,
}

impl SpanStyle {
    /// Plain inherited style.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            bold: false,
            color: SpanColor::Inherit,
            tier: None,
        }
    }

    /// The effective size tier.
    #[must_use]
    pub fn tier_or_default(&self) -> FontTier {
        self.tier.unwrap_or_default()
    }

    /// Style with a tier set, builder-style.
    #[must_use]
    pub const fn with_tier(mut self, tier: FontTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Style with bold set, builder-style.
    #[must_use]
    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Style with a fixed color, builder-style.
    #[must_use]
    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = SpanColor::Fixed(color);
        self
    }
}

/// A run of text sharing one resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub style: SpanStyle,
}

/// Parse markup into an ordered span sequence.
///
/// `base` is the widget's default style; markers layer bold or the
/// secondary color on top of it. Newlines pass through in span text
/// and become hard breaks at wrap time.
#[must_use]
pub fn parse_markup(input: &str, base: SpanStyle) -> Vec<TextSpan> {
    let chars: Vec<char> = input.chars().collect();
    let mut spans: Vec<TextSpan> = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch == '\\' && i + 1 < chars.len() && matches!(chars[i + 1], '*' | '\\') {
            buf.push(chars[i + 1]);
            i += 2;
            continue;
        }
        if ch == '*' {
            let marker_len = if chars.get(i + 1) == Some(&'*') { 2 } else { 1 };
            if let Some(close) = find_closer(&chars, i + marker_len, marker_len) {
                flush(&mut spans, &mut buf, base);
                let inner = literal_text(&chars[i + marker_len..close]);
                let style = if marker_len == 2 {
                    SpanStyle { bold: true, ..base }
                } else {
                    SpanStyle {
                        color: SpanColor::Secondary,
                        ..base
                    }
                };
                if !inner.is_empty() {
                    spans.push(TextSpan { text: inner, style });
                }
                i = close + marker_len;
                continue;
            }
            // Unterminated marker: literal text.
            for _ in 0..marker_len {
                buf.push('*');
            }
            i += marker_len;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    flush(&mut spans, &mut buf, base);
    spans
}

/// Plain text of a span sequence (markers already stripped by parsing).
#[must_use]
pub fn plain_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn flush(spans: &mut Vec<TextSpan>, buf: &mut String, style: SpanStyle) {
    if !buf.is_empty() {
        spans.push(TextSpan {
            text: std::mem::take(buf),
            style,
        });
    }
}

/// Find the next unescaped marker of the given length.
fn find_closer(chars: &[char], from: usize, marker_len: usize) -> Option<usize> {
    let mut j = from;
    while j < chars.len() {
        if chars[j] == '\\' {
            j += 2;
            continue;
        }
        if chars[j] == '*' {
            if marker_len == 1 {
                return Some(j);
            }
            if chars.get(j + 1) == Some(&'*') {
                return Some(j);
            }
        }
        j += 1;
    }
    None
}

/// Content of a styled region: escapes resolved, nested markers
/// stripped (flattening to the outermost style).
fn literal_text(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut j = 0;
    while j < chars.len() {
        if chars[j] == '\\' && j + 1 < chars.len() && matches!(chars[j + 1], '*' | '\\') {
            out.push(chars[j + 1]);
            j += 2;
            continue;
        }
        if chars[j] != '*' {
            out.push(chars[j]);
        }
        j += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(input: &str) -> Vec<TextSpan> {
        parse_markup(input, SpanStyle::plain())
    }

    /// Drop the two marker characters entirely, for order-preservation
    /// checks (matched markers are stripped by parsing, unmatched ones
    /// stay literal, so only the non-marker characters are comparable
    /// across arbitrary inputs).
    fn without_marker_chars(s: &str) -> String {
        s.chars().filter(|c| !matches!(c, '*' | '\\')).collect()
    }

    #[test]
    fn plain_text_is_one_span() {
        let spans = parse("Hello world");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello world");
        assert!(!spans[0].style.bold);
    }

    #[test]
    fn bold_scenario_from_the_wire() {
        let spans = parse("Temp: **22°C**");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Temp: ");
        assert!(!spans[0].style.bold);
        assert_eq!(spans[1].text, "22°C");
        assert!(spans[1].style.bold);
    }

    #[test]
    fn emphasis_resolves_to_secondary_color() {
        let spans = parse("a *b* c");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "b");
        assert_eq!(spans[1].style.color, SpanColor::Secondary);
    }

    #[test]
    fn unterminated_bold_degrades_to_literal() {
        let spans = parse("oops **late");
        assert_eq!(plain_text(&spans), "oops **late");
    }

    #[test]
    fn unterminated_emphasis_degrades_to_literal() {
        let spans = parse("50* off");
        assert_eq!(plain_text(&spans), "50* off");
    }

    #[test]
    fn escaped_markers_are_literal() {
        let spans = parse(r"2 \* 3 = 6 and \\ stays");
        assert_eq!(plain_text(&spans), r"2 * 3 = 6 and \ stays");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn nested_markers_flatten_to_outermost() {
        let spans = parse("**a *b* c**");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a b c");
        assert!(spans[0].style.bold);
        assert_eq!(spans[0].style.color, SpanColor::Inherit);
    }

    #[test]
    fn newlines_pass_through() {
        let spans = parse("line1\n**line2**");
        assert_eq!(plain_text(&spans), "line1\nline2");
    }

    #[test]
    fn empty_markers_produce_no_span() {
        assert_eq!(parse("****"), vec![]);
        let spans = parse("a****b");
        assert_eq!(plain_text(&spans), "ab");
    }

    #[test]
    fn base_style_is_layered_not_replaced() {
        let base = SpanStyle::plain()
            .with_tier(FontTier::Large)
            .with_color(Rgb::new(1, 2, 3));
        let spans = parse_markup("x **y**", base);
        assert_eq!(spans[0].style.color, SpanColor::Fixed(Rgb::new(1, 2, 3)));
        assert_eq!(spans[1].style.tier, Some(FontTier::Large));
        assert!(spans[1].style.bold);
        // Bold keeps the base color; only emphasis swaps it.
        assert_eq!(spans[1].style.color, SpanColor::Fixed(Rgb::new(1, 2, 3)));
    }

    // --- totality ---

    proptest! {
        #[test]
        fn parsing_is_total_and_preserves_content(input in "[ -~°\n\\\\*]{0,64}") {
            let spans = parse(&input);
            // Every non-marker character survives, in order.
            prop_assert_eq!(
                without_marker_chars(&plain_text(&spans)),
                without_marker_chars(&input)
            );
        }

        #[test]
        fn marker_free_input_round_trips_exactly(input in "[ -~°\n]{0,64}") {
            prop_assume!(!input.contains('*') && !input.contains('\\'));
            let spans = parse(&input);
            prop_assert_eq!(plain_text(&spans), input);
        }

        #[test]
        fn parsing_never_panics_on_arbitrary_unicode(input in "\\PC{0,32}") {
            let _ = parse(&input);
        }
    }
}
