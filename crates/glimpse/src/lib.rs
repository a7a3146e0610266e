#![forbid(unsafe_code)]

//! Public facade for the glimpse dashboard compositor.
//!
//! glimpse periodically composes a themed dashboard image from
//! pluggable widgets bound to live data values and pushes it to a
//! small networked display over its HTTP protocol.
//!
//! # Quick tour
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use glimpse::prelude::*;
//!
//! # async fn demo(data: Arc<dyn DataSource>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Arc::new(Pipeline::with_defaults()?);
//! let device = Arc::new(DeviceClient::new("192.168.4.20")?);
//! let screen = Screen::with_default_widgets("bedroom");
//!
//! let registry = CoordinatorRegistry::new();
//! registry.register(CoordinatorHandle::spawn(
//!     "bedroom",
//!     screen,
//!     pipeline,
//!     device,
//!     data,
//!     CoordinatorConfig::default(),
//! ));
//!
//! // Data changes fan out; each coordinator filters by dependency.
//! registry.data_changed(&EntityId::new("sensor.cpu"));
//! # Ok(())
//! # }
//! ```

pub use glimpse_core as core;
pub use glimpse_device as device;
pub use glimpse_layout as layout;
pub use glimpse_render as render;
pub use glimpse_runtime as runtime;
pub use glimpse_style as style;
pub use glimpse_text as text;
pub use glimpse_widgets as widgets;

/// The types most integrations need.
pub mod prelude {
    pub use glimpse_core::config::{Screen, WidgetConfig, WidgetKind, WidgetOptions};
    pub use glimpse_core::data::{DataSource, DataValue, EntityId, StaticData};
    pub use glimpse_core::{Rect, Rgb, Size};
    pub use glimpse_device::{DeviceClient, DeviceError, DisplayTarget};
    pub use glimpse_layout::{LayoutKind, Slot, compute_slots};
    pub use glimpse_render::{FontLibrary, RenderContext};
    pub use glimpse_runtime::{
        CANVAS_SIZE, CoordinatorConfig, CoordinatorHandle, CoordinatorRegistry, CoordinatorState,
        Pipeline, RuntimeError, Trigger, render_preview,
    };
    pub use glimpse_style::{Theme, ThemeRegistry};
    pub use glimpse_text::{RichText, SpanStyle, TextSpan};
    pub use glimpse_widgets::BuiltWidget;
}
