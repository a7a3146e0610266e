#![forbid(unsafe_code)]

//! The update runtime: render pipeline orchestration and per-device
//! update coordination.
//!
//! - [`pipeline`] - one synchronous pass from `Screen` to encoded image
//! - [`coordinator`] - the per-device state machine (debounce,
//!   supersession, fault backoff) on its own tokio task
//! - [`registry`] - explicit process-wide map of device id to
//!   coordinator handle

pub mod coordinator;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use coordinator::{
    CoordinatorConfig, CoordinatorHandle, CoordinatorState, RenderPipeline, Trigger,
};
pub use error::RuntimeError;
pub use pipeline::{CANVAS_SIZE, CycleReport, Pipeline, render_preview};
pub use registry::CoordinatorRegistry;
