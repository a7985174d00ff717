//! Primary weather endpoint: a single GET with a hard timeout.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Title given to the citation synthesized for the primary endpoint.
pub const PRIMARY_SOURCE_TITLE: &str = "Custom Weather API";

/// Why the primary endpoint was abandoned. The `Display` text is shown to
/// the user next to the fallback result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimaryFailure {
    #[error("API Timed Out ({}s)", .0.as_secs())]
    Timeout(Duration),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("API Status: {code} {reason}")]
    Status { code: u16, reason: String },
}

/// A source of raw weather payloads.
pub trait WeatherSource: Send + Sync {
    /// The URL the lookup for `location` goes to.
    fn url_for(&self, location: &str) -> String;

    /// Fetch the raw payload for `location`.
    fn fetch_raw(&self, location: &str) -> Result<String, PrimaryFailure>;
}

/// The HTTP primary endpoint.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    base_url: String,
    timeout: Duration,
}

impl HttpWeatherSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl WeatherSource for HttpWeatherSource {
    fn url_for(&self, location: &str) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}city={}", self.base_url, sep, urlencoding::encode(location))
    }

    fn fetch_raw(&self, location: &str) -> Result<String, PrimaryFailure> {
        let url = self.url_for(location);
        tracing::info!("Fetching from: {}", url);

        let response = ureq::get(&url)
            .set("Accept", "application/json")
            .set("Cache-Control", "no-store")
            .timeout(self.timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => PrimaryFailure::Status {
                    code,
                    reason: resp.status_text().to_string(),
                },
                ureq::Error::Transport(t) => {
                    if transport_timed_out(&t) {
                        PrimaryFailure::Timeout(self.timeout)
                    } else {
                        PrimaryFailure::Network(t.to_string())
                    }
                }
            })?;

        response.into_string().map_err(|e| {
            if is_timeout_kind(e.kind()) {
                PrimaryFailure::Timeout(self.timeout)
            } else {
                PrimaryFailure::Network(e.to_string())
            }
        })
    }
}

fn transport_timed_out(t: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(t);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return is_timeout_kind(io_err.kind());
        }
        source = std::error::Error::source(err);
    }
    false
}

// Read timeouts surface as WouldBlock on some platforms.
fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
