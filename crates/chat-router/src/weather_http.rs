//! wttr.in weather backend

use crate::{Error, Result, WeatherLookup};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_BASE: &str = "https://wttr.in";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// One-line weather report from wttr.in.
///
/// The timeout is deliberately short; the router treats any failure here as
/// a recoverable service-unavailable reply.
pub struct WttrWeather {
    base: String,
    client: reqwest::Client,
}

impl WttrWeather {
    pub fn new() -> Result<Self> {
        Self::with_base(DEFAULT_BASE)
    }

    pub fn with_base(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            base: base.into(),
            client,
        })
    }
}

#[async_trait]
impl WeatherLookup for WttrWeather {
    async fn current(&self, location: &str) -> Result<String> {
        let url = format!(
            "{}/{}?format=3",
            self.base,
            urlencoding::encode(location.trim())
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Lookup(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::Lookup(format!("wttr.in: HTTP {}", resp.status())));
        }
        let text = resp.text().await.map_err(|e| Error::Lookup(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}
