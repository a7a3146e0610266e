#![forbid(unsafe_code)]

//! Font loading and text measurement.
//!
//! Two fontdue faces (regular and bold) are loaded once at startup and
//! shared read-only across all device coordinators. Faces come from a
//! list of well-known system font paths; the first pair that parses
//! wins. When no bold face is available the regular face stands in,
//! so measurement and drawing never diverge.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use fontdue::{Font, FontSettings};

/// Candidate (regular, bold) font file pairs, probed in order.
const FONT_SEARCH_PATHS: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("C:/Windows/Fonts/arial.ttf", "C:/Windows/Fonts/arialbd.ttf"),
];

/// Errors loading font faces.
#[derive(Debug)]
pub enum FontError {
    /// A font file could not be read.
    Io { path: String, source: io::Error },
    /// A font file could not be parsed.
    Parse { path: String, reason: &'static str },
    /// No candidate font path yielded a usable face.
    NoFontsFound,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read font '{path}': {source}"),
            Self::Parse { path, reason } => write!(f, "failed to parse font '{path}': {reason}"),
            Self::NoFontsFound => write!(f, "no usable font found in any search path"),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The loaded regular/bold face pair.
pub struct FontLibrary {
    regular: Font,
    bold: Font,
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary").finish_non_exhaustive()
    }
}

impl FontLibrary {
    /// Load faces from the system font search paths.
    pub fn load() -> Result<Self, FontError> {
        for (regular_path, bold_path) in FONT_SEARCH_PATHS {
            let Ok(regular_bytes) = fs::read(regular_path) else {
                continue;
            };
            let regular = match parse_face(&regular_bytes, regular_path) {
                Ok(face) => face,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping font candidate");
                    continue;
                }
            };
            // Bold is optional; fall back to the regular face.
            let bold = fs::read(bold_path)
                .ok()
                .and_then(|bytes| parse_face(&bytes, bold_path).ok())
                .unwrap_or_else(|| {
                    tracing::debug!(path = bold_path, "no bold face, reusing regular");
                    parse_face(&regular_bytes, regular_path)
                        .expect("face parsed a moment ago parses again")
                });
            tracing::info!(path = regular_path, "loaded font faces");
            return Ok(Self { regular, bold });
        }
        Err(FontError::NoFontsFound)
    }

    /// Build a library from in-memory font data.
    pub fn from_bytes(regular: &[u8], bold: Option<&[u8]>) -> Result<Self, FontError> {
        let regular_face = parse_face(regular, "<memory>")?;
        let bold_face = match bold {
            Some(bytes) => parse_face(bytes, "<memory:bold>")?,
            None => parse_face(regular, "<memory>")?,
        };
        Ok(Self {
            regular: regular_face,
            bold: bold_face,
        })
    }

    /// Load from search paths, or `None` when the host has no fonts.
    ///
    /// Test helper: lets font-dependent tests skip on bare machines
    /// instead of failing.
    #[must_use]
    pub fn load_or_skip() -> Option<Self> {
        Self::load().ok()
    }

    /// The face for a weight.
    #[must_use]
    pub fn face(&self, bold: bool) -> &Font {
        if bold { &self.bold } else { &self.regular }
    }

    /// Advance width of a text run at a pixel size, kerning included.
    #[must_use]
    pub fn line_width(&self, text: &str, px: f32, bold: bool) -> f32 {
        let face = self.face(bold);
        let mut width = 0.0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(prev) = prev
                && let Some(kern) = face.horizontal_kern(prev, ch, px)
            {
                width += kern;
            }
            width += face.metrics(ch, px).advance_width;
            prev = Some(ch);
        }
        width
    }

    /// (ascent, descent, line height) at a pixel size. Descent is
    /// negative, matching fontdue.
    #[must_use]
    pub fn vertical_metrics(&self, px: f32, bold: bool) -> (f32, f32, f32) {
        match self.face(bold).horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent, m.new_line_size),
            // Fonts without horizontal metrics are degenerate; fall back
            // to the nominal size.
            None => (px * 0.8, -(px * 0.2), px * 1.2),
        }
    }
}

fn parse_face(bytes: &[u8], path: &str) -> Result<Font, FontError> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| FontError::Parse {
        path: path.to_string(),
        reason,
    })
}
