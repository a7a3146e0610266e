#![forbid(unsafe_code)]

//! Named style bundles and the registry that resolves them.

use std::fmt;

use glimpse_core::Rgb;
use rustc_hash::FxHashMap;

/// How widget panels draw their borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// No border.
    #[default]
    None,
    /// Filled panel with a border stroke.
    Solid,
    /// Border stroke only, no panel fill.
    Outline,
}

/// A theme: every visual parameter a widget may consult.
///
/// Immutable once loaded. Widgets read, never write.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Unique theme identifier.
    pub name: &'static str,

    // Shape
    /// Corner rounding in logical pixels (0 = sharp).
    pub corner_radius: u16,
    /// Border thickness in logical pixels (0 = none).
    pub border_width: u16,
    /// How borders are drawn.
    pub border_style: BorderStyle,

    // Spacing
    /// Padding around the entire layout, logical pixels.
    pub layout_padding: u16,
    /// Padding inside widgets, percent of slot width.
    pub widget_padding: u16,
    /// Gap between slots, logical pixels.
    pub gap: u16,

    // Palette
    /// Canvas background.
    pub background: Rgb,
    /// Widget panel fill.
    pub panel_fill: Rgb,
    /// Widget panel border.
    pub panel_border: Rgb,
    /// Primary text (values, main content).
    pub text_primary: Rgb,
    /// Secondary text (labels, muted content, emphasized spans).
    pub text_secondary: Rgb,
    /// Accent colors, cycled per slot index.
    pub accents: Vec<Rgb>,

    // Typography
    /// Whether primary values render bold.
    pub value_bold: bool,

    // Effects
    /// Glow halo around panel borders.
    pub glow_effect: bool,
    /// Retro scanline overlay.
    pub scanlines: bool,
    /// Outline-only bars and gauges.
    pub invert_bars: bool,
}

impl Theme {
    /// Accent color for a slot index, wrapping around the palette.
    #[must_use]
    pub fn accent(&self, index: usize) -> Rgb {
        if self.accents.is_empty() {
            return self.text_primary;
        }
        self.accents[index % self.accents.len()]
    }

    /// Widget-internal padding in pixels for a slot of the given width.
    #[must_use]
    pub fn padding_px(&self, slot_width: u16) -> u16 {
        (slot_width as u32 * self.widget_padding as u32 / 100) as u16
    }

    /// The dark default: rounded filled panels on black.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: "classic",
            corner_radius: 8,
            border_width: 0,
            border_style: BorderStyle::None,
            layout_padding: 8,
            widget_padding: 6,
            gap: 6,
            background: Rgb::new(0, 0, 0),
            panel_fill: Rgb::new(18, 18, 18),
            panel_border: Rgb::new(60, 60, 60),
            text_primary: Rgb::new(255, 255, 255),
            text_secondary: Rgb::new(150, 150, 150),
            accents: vec![
                Rgb::new(27, 158, 119),
                Rgb::new(217, 95, 2),
                Rgb::new(117, 112, 179),
                Rgb::new(231, 41, 138),
                Rgb::new(102, 166, 30),
                Rgb::new(230, 171, 2),
            ],
            value_bold: true,
            glow_effect: false,
            scanlines: false,
            invert_bars: false,
        }
    }

    /// Thin borders, no fills, a single cool accent.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            name: "minimal",
            corner_radius: 0,
            border_width: 1,
            border_style: BorderStyle::Solid,
            layout_padding: 4,
            widget_padding: 4,
            gap: 4,
            background: Rgb::new(0, 0, 0),
            panel_fill: Rgb::new(0, 0, 0),
            panel_border: Rgb::new(80, 80, 80),
            text_primary: Rgb::new(255, 255, 255),
            text_secondary: Rgb::new(120, 120, 120),
            accents: vec![Rgb::new(100, 200, 255)],
            value_bold: false,
            glow_effect: false,
            scanlines: false,
            invert_bars: false,
        }
    }

    /// Thick cyan borders with a glow halo.
    #[must_use]
    pub fn neon() -> Self {
        Self {
            name: "neon",
            corner_radius: 4,
            border_width: 3,
            border_style: BorderStyle::Solid,
            layout_padding: 8,
            widget_padding: 6,
            gap: 6,
            background: Rgb::new(0, 0, 0),
            panel_fill: Rgb::new(10, 10, 15),
            panel_border: Rgb::new(0, 255, 255),
            text_primary: Rgb::new(255, 255, 255),
            text_secondary: Rgb::new(200, 200, 200),
            accents: vec![
                Rgb::new(0, 255, 255),
                Rgb::new(255, 0, 255),
                Rgb::new(0, 255, 128),
                Rgb::new(255, 100, 200),
                Rgb::new(100, 200, 255),
            ],
            value_bold: true,
            glow_effect: true,
            scanlines: false,
            invert_bars: false,
        }
    }

    /// Terminal green with scanlines and outline-only gauges.
    #[must_use]
    pub fn retro() -> Self {
        Self {
            name: "retro",
            corner_radius: 0,
            border_width: 1,
            border_style: BorderStyle::Outline,
            layout_padding: 10,
            widget_padding: 8,
            gap: 8,
            background: Rgb::new(0, 5, 0),
            panel_fill: Rgb::new(0, 0, 0),
            panel_border: Rgb::new(0, 180, 0),
            text_primary: Rgb::new(0, 255, 0),
            text_secondary: Rgb::new(0, 150, 0),
            accents: vec![Rgb::new(0, 255, 0), Rgb::new(255, 180, 0)],
            value_bold: false,
            glow_effect: false,
            scanlines: true,
            invert_bars: true,
        }
    }

    /// Large radii and muted pastels on a blue-gray ground.
    #[must_use]
    pub fn soft() -> Self {
        Self {
            name: "soft",
            corner_radius: 16,
            border_width: 1,
            border_style: BorderStyle::Solid,
            layout_padding: 12,
            widget_padding: 8,
            gap: 10,
            background: Rgb::new(15, 15, 20),
            panel_fill: Rgb::new(30, 30, 40),
            panel_border: Rgb::new(50, 50, 65),
            text_primary: Rgb::new(240, 240, 245),
            text_secondary: Rgb::new(140, 140, 155),
            accents: vec![
                Rgb::new(120, 180, 220),
                Rgb::new(180, 140, 200),
                Rgb::new(140, 200, 160),
                Rgb::new(220, 180, 140),
                Rgb::new(200, 150, 180),
            ],
            value_bold: false,
            glow_effect: false,
            scanlines: false,
            invert_bars: false,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Lookup failure for a theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme {
    /// The name that failed to resolve.
    pub name: String,
}

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.name)
    }
}

impl std::error::Error for UnknownTheme {}

/// Registry of themes, read-only after construction.
#[derive(Debug)]
pub struct ThemeRegistry {
    themes: FxHashMap<String, Theme>,
}

impl ThemeRegistry {
    /// Registry pre-populated with the built-in themes.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut themes = FxHashMap::default();
        for theme in [
            Theme::classic(),
            Theme::minimal(),
            Theme::neon(),
            Theme::retro(),
            Theme::soft(),
        ] {
            themes.insert(theme.name.to_string(), theme);
        }
        Self { themes }
    }

    /// Resolve a theme by name.
    pub fn resolve(&self, name: &str) -> Result<&Theme, UnknownTheme> {
        self.themes.get(name).ok_or_else(|| UnknownTheme {
            name: name.to_string(),
        })
    }

    /// Resolve with the defined fallback: the classic theme.
    ///
    /// The failed lookup is logged; a render is never aborted over a
    /// theme name.
    #[must_use]
    pub fn resolve_or_default(&self, name: &str) -> &Theme {
        match self.resolve(name) {
            Ok(theme) => theme,
            Err(err) => {
                tracing::warn!(theme = name, "{err}, falling back to classic");
                self.themes
                    .get("classic")
                    .expect("builtin classic theme is always registered")
            }
        }
    }

    /// Registered theme names, for config UIs.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_succeeds() {
        let registry = ThemeRegistry::with_builtins();
        for name in ["classic", "minimal", "neon", "retro", "soft"] {
            assert_eq!(registry.resolve(name).unwrap().name, name);
        }
    }

    #[test]
    fn unknown_theme_is_an_explicit_outcome() {
        let registry = ThemeRegistry::with_builtins();
        let err = registry.resolve("vaporwave").unwrap_err();
        assert_eq!(err.name, "vaporwave");
        assert_eq!(err.to_string(), "unknown theme 'vaporwave'");
    }

    #[test]
    fn fallback_is_classic() {
        let registry = ThemeRegistry::with_builtins();
        assert_eq!(registry.resolve_or_default("vaporwave").name, "classic");
    }

    #[test]
    fn accent_cycles_through_palette() {
        let theme = Theme::classic();
        let n = theme.accents.len();
        assert_eq!(theme.accent(0), theme.accents[0]);
        assert_eq!(theme.accent(n), theme.accents[0]);
        assert_eq!(theme.accent(n + 2), theme.accents[2]);
    }

    #[test]
    fn accent_with_empty_palette_falls_back_to_text() {
        let mut theme = Theme::minimal();
        theme.accents.clear();
        assert_eq!(theme.accent(3), theme.text_primary);
    }

    #[test]
    fn padding_scales_with_slot_width() {
        let theme = Theme::classic();
        assert_eq!(theme.padding_px(100), 6);
        assert_eq!(theme.padding_px(240), 14);
    }

    #[test]
    fn retro_carries_its_effects() {
        let retro = Theme::retro();
        assert!(retro.scanlines);
        assert!(retro.invert_bars);
        assert_eq!(retro.border_style, BorderStyle::Outline);
    }
}
