#![forbid(unsafe_code)]

//! Device communication errors.

use thiserror::Error;

/// What went wrong talking to the device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The call exceeded its bounded timeout. Transient.
    #[error("device request timed out: {0}")]
    Timeout(String),
    /// TCP-level failure (connection refused, reset, no route).
    /// Transient.
    #[error("device unreachable: {0}")]
    Unreachable(String),
    /// The device answered with a non-success status. Not retried.
    #[error("device protocol error on {endpoint}: status {status}")]
    Protocol { status: u16, endpoint: String },
    /// The device answered with something unparseable. Not retried.
    #[error("invalid device response: {0}")]
    InvalidResponse(String),
}

impl DeviceError {
    /// Whether a retry with backoff is worthwhile.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unreachable(_))
    }

    /// Classify a transport error from the HTTP layer.
    pub(crate) fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            Self::Unreachable(err.to_string())
        } else {
            Self::InvalidResponse(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(DeviceError::Timeout("t".into()).is_transient());
        assert!(DeviceError::Unreachable("u".into()).is_transient());
        assert!(
            !DeviceError::Protocol {
                status: 500,
                endpoint: "/set".into()
            }
            .is_transient()
        );
        assert!(!DeviceError::InvalidResponse("x".into()).is_transient());
    }

    #[test]
    fn display_includes_endpoint_and_status() {
        let err = DeviceError::Protocol {
            status: 404,
            endpoint: "/set?img=/image/a.jpg".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("/set?img=/image/a.jpg"));
    }
}
