#![forbid(unsafe_code)]

//! Client for the display's HTTP protocol.
//!
//! The protocol is fixed by the hardware:
//!
//! | Call | Purpose |
//! |---|---|
//! | `POST /doUpload?dir=/image/` (multipart) | upload encoded image |
//! | `GET /set?img=/image/{file}` | select uploaded file for display |
//! | `GET /set?theme=3` | switch into custom-image display mode |
//! | `GET /set?brt={0-100}` | set brightness |
//! | `GET /app.json` | query device status/liveness |
//!
//! Every call has a bounded timeout. Transient failures (timeout,
//! connection refused) are retried a small fixed number of times with
//! exponential backoff; protocol errors are surfaced immediately.

pub mod client;
pub mod error;

pub use client::{DeviceClient, DisplayTarget, UPLOAD_DIR};
pub use error::DeviceError;
