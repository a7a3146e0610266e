#![forbid(unsafe_code)]

//! Theme system for the glimpse compositor.
//!
//! A [`Theme`] is an immutable bundle of shape, spacing, palette,
//! typography, and effect choices. Themes are looked up by name in a
//! [`ThemeRegistry`]; an unknown name is an explicit [`UnknownTheme`]
//! outcome paired with a defined fallback, never a silent substitution.

pub mod theme;

pub use theme::{BorderStyle, Theme, ThemeRegistry, UnknownTheme};
