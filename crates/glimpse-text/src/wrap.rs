#![forbid(unsafe_code)]

//! Word wrap over styled spans.
//!
//! Greedy packing: each span's text is split on space boundaries, each
//! word is measured with its leading space in the span's resolved
//! font, and words fill the current line while they fit. A single word
//! wider than the limit is placed alone on its own line - never
//! deferred forever. Hard breaks (`\n`) always start a new line.
//! Wrapping the same spans at the same width always yields the same
//! line sequence.

use smallvec::SmallVec;

use crate::markup::{SpanStyle, TextSpan};

/// Measurement capability the wrapper needs; implemented by the render
/// context (and by fixed-advance fakes in tests).
pub trait TextMeasure {
    /// (advance width, line height) of a run in the style's resolved
    /// font, in logical pixels.
    fn span_size(&mut self, text: &str, style: &SpanStyle) -> (u32, u32);
}

/// A measured fragment of one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFragment {
    pub text: String,
    pub style: SpanStyle,
    /// Measured advance width in logical pixels.
    pub width: u32,
}

/// One wrapped line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub fragments: SmallVec<[LineFragment; 4]>,
    /// Total measured width.
    pub width: u32,
    /// Line height (the tallest fragment's).
    pub height: u32,
}

impl Line {
    /// Concatenated text of the line.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, style: SpanStyle, width: u32, height: u32) {
        self.width += width;
        self.height = self.height.max(height);
        if let Some(last) = self.fragments.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            last.width += width;
            return;
        }
        self.fragments.push(LineFragment {
            text: text.to_string(),
            style,
            width,
        });
    }
}

/// A token produced from the span stream.
enum Token<'a> {
    /// A word, carrying its leading spaces.
    Word { text: &'a str, style: SpanStyle },
    /// A hard line break.
    Break { style: SpanStyle },
}

/// Wrap spans to `max_width` logical pixels.
#[must_use]
pub fn wrap_spans(
    spans: &[TextSpan],
    max_width: u32,
    measure: &mut impl TextMeasure,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();
    let base_style = spans.first().map(|s| s.style).unwrap_or_default();

    let finish =
        |lines: &mut Vec<Line>, current: &mut Line, measure: &mut dyn FnMut() -> u32| {
            if current.height == 0 {
                // Empty lines still occupy a row.
                current.height = measure();
            }
            lines.push(std::mem::take(current));
        };

    for token in tokenize(spans) {
        match token {
            Token::Break { style } => {
                let mut blank_height = || measure.span_size("", &style).1;
                finish(&mut lines, &mut current, &mut blank_height);
            }
            Token::Word { text, style } => {
                let (width, height) = measure.span_size(text, &style);
                if current.width + width <= max_width {
                    current.push(text, style, width, height);
                    continue;
                }
                if !current.fragments.is_empty() {
                    let mut blank_height = || measure.span_size("", &style).1;
                    finish(&mut lines, &mut current, &mut blank_height);
                }
                // A wrapped word drops its separator space; whatever
                // remains goes on the fresh line even when over-wide,
                // so no word is deferred forever.
                let trimmed = text.trim_start_matches(' ');
                if trimmed.is_empty() {
                    continue;
                }
                let (width, height) = measure.span_size(trimmed, &style);
                current.push(trimmed, style, width, height);
            }
        }
    }

    if !current.fragments.is_empty() || lines.is_empty() {
        let mut blank_height = || measure.span_size("", &base_style).1;
        finish(&mut lines, &mut current, &mut blank_height);
    }
    lines
}

/// Split spans into words (keeping leading spaces) and hard breaks.
fn tokenize(spans: &[TextSpan]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for span in spans {
        for (i, segment) in span.text.split('\n').enumerate() {
            if i > 0 {
                tokens.push(Token::Break { style: span.style });
            }
            let mut rest = segment;
            while !rest.is_empty() {
                let spaces = rest.len() - rest.trim_start_matches(' ').len();
                let after = &rest[spaces..];
                let word_len = after.find(' ').unwrap_or(after.len());
                let end = spaces + word_len;
                tokens.push(Token::Word {
                    text: &rest[..end],
                    style: span.style,
                });
                rest = &rest[end..];
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{SpanColor, parse_markup};
    use proptest::prelude::*;

    /// Fixed-advance measurer: every char is `advance` px wide, lines
    /// are 10 px tall. Keeps wrap tests independent of system fonts.
    struct FixedMeasure {
        advance: u32,
    }

    impl TextMeasure for FixedMeasure {
        fn span_size(&mut self, text: &str, _style: &SpanStyle) -> (u32, u32) {
            (text.chars().count() as u32 * self.advance, 10)
        }
    }

    fn words(input: &str, max_width: u32) -> Vec<String> {
        let spans = parse_markup(input, SpanStyle::plain());
        wrap_spans(&spans, max_width, &mut FixedMeasure { advance: 10 })
            .iter()
            .map(Line::text)
            .collect()
    }

    #[test]
    fn packs_greedily() {
        // 10 px per char, 90 px limit: "Hello" (50) + " foo" (40) fit.
        assert_eq!(words("Hello foo bar", 90), vec!["Hello foo", "bar"]);
    }

    #[test]
    fn single_word_per_line_when_narrow() {
        assert_eq!(words("aa bb cc", 20), vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn overwide_word_is_placed_alone() {
        let lines = words("hi incomprehensibilities yo", 80);
        assert_eq!(lines, vec!["hi", "incomprehensibilities", "yo"]);
    }

    #[test]
    fn hard_break_always_breaks() {
        assert_eq!(words("a\nb", 1000), vec!["a", "b"]);
        assert_eq!(words("a\n\nb", 1000), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_input_is_one_empty_line() {
        let lines = wrap_spans(&[], 100, &mut FixedMeasure { advance: 10 });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "");
        assert_eq!(lines[0].height, 10);
    }

    #[test]
    fn style_survives_wrapping() {
        let spans = parse_markup("plain **bold tail**", SpanStyle::plain());
        let lines = wrap_spans(&spans, 110, &mut FixedMeasure { advance: 10 });
        // "plain bold" (with the space) is 100 px; "tail" wraps.
        assert_eq!(lines.len(), 2);
        let last = &lines[1];
        assert_eq!(last.text(), "tail");
        assert!(last.fragments[0].style.bold);
    }

    #[test]
    fn adjacent_same_style_fragments_merge() {
        let spans = parse_markup("one two", SpanStyle::plain());
        let lines = wrap_spans(&spans, 1000, &mut FixedMeasure { advance: 10 });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].fragments.len(), 1);
        assert_eq!(lines[0].fragments[0].text, "one two");
    }

    #[test]
    fn emphasis_fragment_stays_separate() {
        let spans = parse_markup("a *b*", SpanStyle::plain());
        let lines = wrap_spans(&spans, 1000, &mut FixedMeasure { advance: 10 });
        assert_eq!(lines[0].fragments.len(), 2);
        assert_eq!(lines[0].fragments[1].style.color, SpanColor::Secondary);
    }

    proptest! {
        #[test]
        fn no_line_exceeds_width_except_lone_words(
            input in "[a-z ]{0,80}",
            max_width in 20u32..200,
        ) {
            let spans = parse_markup(&input, SpanStyle::plain());
            let mut measure = FixedMeasure { advance: 10 };
            for line in wrap_spans(&spans, max_width, &mut measure) {
                let over = line.width > max_width;
                if over {
                    // Only a single unsplittable word may exceed.
                    prop_assert_eq!(line.fragments.len(), 1);
                    prop_assert!(!line.text().contains(' '));
                }
            }
        }

        #[test]
        fn wrapping_is_idempotent(
            input in "[a-z \n]{0,80}",
            max_width in 10u32..200,
        ) {
            let spans = parse_markup(&input, SpanStyle::plain());
            let a = wrap_spans(&spans, max_width, &mut FixedMeasure { advance: 10 });
            let b = wrap_spans(&spans, max_width, &mut FixedMeasure { advance: 10 });
            prop_assert_eq!(a, b);
        }

        #[test]
        fn no_content_is_lost_modulo_wrap_spaces(
            input in "[a-z ]{0,80}",
            max_width in 10u32..200,
        ) {
            let spans = parse_markup(&input, SpanStyle::plain());
            let lines = wrap_spans(&spans, max_width, &mut FixedMeasure { advance: 10 });
            let rejoined: String = lines.iter().map(Line::text).collect::<Vec<_>>().join(" ");
            let norm = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(norm(&rejoined), norm(&input));
        }
    }
}
