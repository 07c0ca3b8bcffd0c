//! Client for the AlienVault OTX pulse API.

use std::time::Duration;

use super::indicator::{Indicator, Pulse};
use crate::{Error, Result};

/// Default OTX endpoint.
pub const DEFAULT_BASE_URL: &str = "https://otx.alienvault.com";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-OTX-API-KEY";

/// Environment variable read by the CLI for the API key.
pub const API_KEY_ENV: &str = "OTX_API_KEY";

/// Connection settings for [`OtxClient`].
#[derive(Debug, Clone)]
pub struct OtxConfig {
    /// Base URL of the OTX service, without trailing slash
    pub base_url: String,
    /// API key sent with each request
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OtxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OtxConfig {
    /// Create a config for the public OTX service.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Use a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of a pulse.
    pub fn pulse_url(&self, pulse_id: &str) -> String {
        format!("{}/api/v1/pulses/{}", self.base_url, pulse_id)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "OTX API key is missing (pass --api-key or set {})",
                API_KEY_ENV
            )));
        }
        if self.base_url.is_empty() {
            return Err(Error::Config("OTX base URL is empty".to_string()));
        }
        Ok(())
    }
}

/// Blocking OTX client.
pub struct OtxClient {
    config: OtxConfig,
    http: reqwest::blocking::Client,
}

impl OtxClient {
    /// Build a client.
    pub fn new(config: OtxConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OtxConfig {
        &self.config
    }

    /// Fetch a pulse.
    pub fn pulse(&self, pulse_id: &str) -> Result<Pulse> {
        let pulse_id = pulse_id.trim();
        if pulse_id.is_empty() {
            return Err(Error::Config("pulse ID is empty".to_string()));
        }

        let url = self.config.pulse_url(pulse_id);
        log::debug!("Fetching pulse {}", url);

        let body = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key.trim())
            .send()?
            .error_for_status()?
            .text()?;

        let pulse = Pulse::from_json(&body)?;
        log::info!(
            "Fetched pulse {} with {} indicators",
            pulse_id,
            pulse.indicators.len()
        );
        Ok(pulse)
    }

    /// Fetch the indicators of a pulse.
    pub fn pulse_indicators(&self, pulse_id: &str) -> Result<Vec<Indicator>> {
        Ok(self.pulse(pulse_id)?.indicators)
    }

    /// Fetch the indicators of a pulse, logging any failure and returning
    /// no indicators instead.
    pub fn pulse_indicators_or_empty(&self, pulse_id: &str) -> Vec<Indicator> {
        match self.pulse_indicators(pulse_id) {
            Ok(indicators) => indicators,
            Err(e) => {
                log::error!("Error retrieving pulse indicators: {}", e);
                Vec::new()
            }
        }
    }
}
