#![forbid(unsafe_code)]

//! Runtime errors.
//!
//! Per-widget and per-span failures never reach this type; they are
//! contained inside the pipeline as placeholders and logged fallbacks.
//! What remains is the small set of failures that fault a cycle.

use glimpse_device::DeviceError;
use glimpse_render::{EncodeError, FontError};
use thiserror::Error;

/// A failure that faults a render/upload cycle.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No usable font could be loaded at startup.
    #[error("font setup failed: {0}")]
    Font(#[from] FontError),
    /// The composed image could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Device communication failed after the retry budget.
    #[error(transparent)]
    Device(#[from] DeviceError),
}
