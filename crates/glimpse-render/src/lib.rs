#![forbid(unsafe_code)]

//! Rendering kernel for the glimpse compositor.
//!
//! This crate owns the per-cycle pixel state:
//!
//! - [`canvas`] - the supersampled RGB buffer and shape rasterization
//! - [`fonts`] - fontdue faces, the size ladder, and measurement caching
//! - [`context`] - the logical-pixel drawing API widgets target
//! - [`icons`] - the built-in geometric icon set
//! - [`encode`] - JPEG/PNG output
//!
//! All widget-facing math is in logical pixels; the supersampling
//! factor is applied at buffer-write time and the buffer is
//! downsampled exactly once per cycle, in [`RenderContext::finish`].

pub mod canvas;
pub mod context;
pub mod encode;
pub mod fonts;
pub mod icons;

// Downstream crates handle the composed `RgbImage` without pinning
// their own copy of the image crate.
pub use image;

pub use canvas::Canvas;
pub use context::{Anchor, RenderContext, SUPERSAMPLE, VAlign};
pub use encode::{EncodeError, encode_jpeg, encode_png};
pub use fonts::{FontError, FontLibrary};
