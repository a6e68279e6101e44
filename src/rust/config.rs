use std::env;
use std::time::Duration;

use crate::classifier::MAX_UPLOAD_BYTES;

pub const ENDPOINT_VAR: &str = "PAWPRINT_ENDPOINT";
pub const STAND_IN_VAR: &str = "PAWPRINT_STAND_IN";
pub const TIMEOUT_VAR: &str = "PAWPRINT_TIMEOUT_SECS";

/// Settings for a classifier session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the inference service. `None` means no service is known.
    pub endpoint: Option<String>,
    /// Whether the placeholder classifier may answer when no endpoint is set
    pub stand_in: bool,
    /// Simulated latency of the placeholder classifier
    pub stand_in_delay: Duration,
    /// Upper bound for a remote request. Unset leaves it to the transport.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            stand_in: true,
            stand_in_delay: Duration::ZERO,
            request_timeout: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from `PAWPRINT_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub(crate) fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(flag) = lookup(STAND_IN_VAR) {
            config.stand_in = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        config.request_timeout = lookup(TIMEOUT_VAR)
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config
    }

    /// Sets the endpoint. Blank values clear it; a trailing slash is dropped.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.set_endpoint(endpoint);
        self
    }

    pub fn with_stand_in(mut self, enabled: bool) -> Self {
        self.stand_in = enabled;
        self
    }

    pub fn with_stand_in_delay(mut self, delay: Duration) -> Self {
        self.stand_in_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_max_upload_bytes(mut self, max_bytes: u64) -> Self {
        self.max_upload_bytes = max_bytes;
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub(crate) fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim().trim_end_matches('/');
        self.endpoint = (!endpoint.is_empty()).then(|| endpoint.to_string());
    }
}
