#![forbid(unsafe_code)]

//! Rich-text engine: markup parsing, word wrap, and line rendering.
//!
//! The markup grammar is intentionally small: `**bold**`, `*emphasis*`
//! (drawn in the theme's secondary color, since the display has no
//! italic face), literal newlines as hard breaks, and backslash escapes
//! for the marker characters. Parsing is total - malformed input always
//! yields some valid span sequence, never an error.

pub mod markup;
pub mod rich;
pub mod wrap;

pub use markup::{SpanColor, SpanStyle, TextSpan, parse_markup};
pub use rich::RichText;
pub use wrap::{Line, LineFragment, TextMeasure, wrap_spans};
