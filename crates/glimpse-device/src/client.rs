#![forbid(unsafe_code)]

//! The device client and the `DisplayTarget` seam the runtime uses.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::DeviceError;

/// Directory on the device's flash where images land.
pub const UPLOAD_DIR: &str = "/image/";

/// Per-call timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Retry budget for transient failures.
const RETRY_BUDGET: u32 = 3;

/// First backoff delay; doubles per attempt.
const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// The upload surface the update coordinator talks to.
///
/// `DeviceClient` is the real implementation; tests substitute mocks
/// so coordinator behavior can be driven without hardware.
#[async_trait]
pub trait DisplayTarget: Send + Sync {
    /// Upload an encoded frame and make the device show it.
    async fn push_frame(&self, jpeg: &[u8], filename: &str) -> Result<(), DeviceError>;

    /// Set panel brightness, 0-100.
    async fn set_brightness(&self, percent: u8) -> Result<(), DeviceError>;
}

/// HTTP client for one physical display.
#[derive(Debug)]
pub struct DeviceClient {
    http: reqwest::Client,
    base: String,
    retries: u32,
    backoff_base: Duration,
    /// The custom-image mode switch only needs to be sent once per
    /// process lifetime; the device remembers it.
    custom_mode_sent: AtomicBool,
}

impl DeviceClient {
    /// Client for a device reachable at `host` (IP or hostname).
    pub fn new(host: &str) -> Result<Self, DeviceError> {
        Self::with_config(host, REQUEST_TIMEOUT, RETRY_BUDGET, BACKOFF_BASE)
    }

    /// Client with explicit timeout/retry tuning.
    pub fn with_config(
        host: &str,
        timeout: Duration,
        retries: u32,
        backoff_base: Duration,
    ) -> Result<Self, DeviceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };
        Ok(Self {
            http,
            base,
            retries,
            backoff_base,
            custom_mode_sent: AtomicBool::new(false),
        })
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// Run a call through the transient-retry policy.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T, DeviceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DeviceError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retries => {
                    let delay = self.backoff_base * 2u32.saturating_pow(attempt);
                    tracing::warn!(
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient device failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_ok(&self, path_and_query: &str) -> Result<(), DeviceError> {
        let url = self.url(path_and_query);
        self.with_retry(|| async {
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| DeviceError::classify(&e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(DeviceError::Protocol {
                    status: status.as_u16(),
                    endpoint: path_and_query.to_string(),
                });
            }
            Ok(())
        })
        .await
    }

    /// Upload an encoded image to the device's image directory.
    pub async fn upload_image(&self, filename: &str, bytes: &[u8]) -> Result<(), DeviceError> {
        let endpoint = format!("/doUpload?dir={UPLOAD_DIR}");
        let url = self.url(&endpoint);
        self.with_retry(|| async {
            let part = Part::bytes(bytes.to_vec())
                .file_name(filename.to_string())
                .mime_str("image/jpeg")
                .map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;
            let form = Form::new().part("file", part);
            let resp = self
                .http
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(|e| DeviceError::classify(&e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(DeviceError::Protocol {
                    status: status.as_u16(),
                    endpoint: endpoint.clone(),
                });
            }
            Ok(())
        })
        .await
    }

    /// Point the display at an uploaded file.
    pub async fn show_image(&self, filename: &str) -> Result<(), DeviceError> {
        self.get_ok(&format!("/set?img={UPLOAD_DIR}{filename}")).await
    }

    /// Switch the device into custom-image display mode.
    pub async fn set_custom_mode(&self) -> Result<(), DeviceError> {
        self.get_ok("/set?theme=3").await
    }

    /// Query `/app.json` for status/liveness.
    pub async fn status(&self) -> Result<serde_json::Value, DeviceError> {
        let url = self.url("/app.json");
        self.with_retry(|| async {
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| DeviceError::classify(&e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(DeviceError::Protocol {
                    status: status.as_u16(),
                    endpoint: "/app.json".to_string(),
                });
            }
            resp.json::<serde_json::Value>()
                .await
                .map_err(|e| DeviceError::InvalidResponse(e.to_string()))
        })
        .await
    }
}

#[async_trait]
impl DisplayTarget for DeviceClient {
    async fn push_frame(&self, jpeg: &[u8], filename: &str) -> Result<(), DeviceError> {
        self.upload_image(filename, jpeg).await?;
        if !self.custom_mode_sent.load(Ordering::Relaxed) {
            self.set_custom_mode().await?;
            self.custom_mode_sent.store(true, Ordering::Relaxed);
        }
        self.show_image(filename).await
    }

    async fn set_brightness(&self, percent: u8) -> Result<(), DeviceError> {
        self.get_ok(&format!("/set?brt={}", percent.min(100))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn client() -> DeviceClient {
        DeviceClient::with_config(
            "192.168.4.20",
            Duration::from_secs(1),
            3,
            Duration::from_millis(10),
        )
        .unwrap()
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(client().url("/app.json"), "http://192.168.4.20/app.json");
    }

    #[test]
    fn explicit_scheme_and_trailing_slash_are_respected() {
        let c = DeviceClient::new("http://display.local/").unwrap();
        assert_eq!(
            c.url("/set?img=/image/dash.jpg"),
            "http://display.local/set?img=/image/dash.jpg"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhausts_budget_on_transient_errors() {
        let c = client();
        let calls = AtomicU32::new(0);
        let result: Result<(), DeviceError> = c
            .with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(DeviceError::Timeout("simulated".into())) }
            })
            .await;
        assert!(matches!(result, Err(DeviceError::Timeout(_))));
        // Initial attempt plus the full retry budget.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn protocol_errors_are_not_retried() {
        let c = client();
        let calls = AtomicU32::new(0);
        let result: Result<(), DeviceError> = c
            .with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(DeviceError::Protocol {
                        status: 500,
                        endpoint: "/set".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(DeviceError::Protocol { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_recovers_after_transient_failures() {
        let c = client();
        let calls = AtomicU32::new(0);
        let result = c
            .with_retry(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(DeviceError::Unreachable("flaky".into()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 2);
    }
}
