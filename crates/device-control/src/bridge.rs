//! HTTP client backends for a local device bridge.
//!
//! The bridge wraps the vendor SDKs (camera, lamp, plug) behind a small REST
//! surface; each capability call here is one transient request.

use crate::{CameraControl, Error, PowerSwitch, Result};
use async_trait::async_trait;

fn http_err(e: reqwest::Error) -> Error {
    Error::Device(e.to_string())
}

/// Pan/tilt camera reached through the bridge.
pub struct BridgeCamera {
    endpoint: String,
    client: reqwest::Client,
}

impl BridgeCamera {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Device(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl CameraControl for BridgeCamera {
    async fn move_relative(&self, pan_deg: f32, tilt_deg: f32) -> Result<()> {
        #[derive(serde::Serialize)]
        struct MoveReq {
            pan_deg: f32,
            tilt_deg: f32,
        }
        let resp = self
            .client
            .post(format!("{}/camera/move", self.endpoint))
            .json(&MoveReq { pan_deg, tilt_deg })
            .send()
            .await
            .map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(Error::Device(format!("bridge: HTTP {}", resp.status())));
        }
        Ok(())
    }

    async fn capture_snapshot(&self) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(format!("{}/camera/snapshot", self.endpoint))
            .send()
            .await
            .map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(Error::Device(format!("bridge: HTTP {}", resp.status())));
        }
        let bytes = resp.bytes().await.map_err(http_err)?;
        Ok(bytes.to_vec())
    }

    async fn goto_preset(&self, index: u32) -> Result<()> {
        #[derive(serde::Serialize)]
        struct PresetReq {
            index: u32,
        }
        let resp = self
            .client
            .post(format!("{}/camera/preset", self.endpoint))
            .json(&PresetReq { index })
            .send()
            .await
            .map_err(http_err)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::PresetNotFound(index));
        }
        if !resp.status().is_success() {
            return Err(Error::Device(format!("bridge: HTTP {}", resp.status())));
        }
        Ok(())
    }
}

/// Switchable lamp or plug reached through the bridge.
pub struct BridgeSwitch {
    endpoint: String,
    device: String,
    client: reqwest::Client,
}

impl BridgeSwitch {
    pub fn new(endpoint: impl Into<String>, device: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Device(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            device: device.into(),
            client,
        })
    }
}

#[async_trait]
impl PowerSwitch for BridgeSwitch {
    async fn set_power(&self, on: bool) -> Result<()> {
        #[derive(serde::Serialize)]
        struct PowerReq {
            on: bool,
        }
        let resp = self
            .client
            .post(format!("{}/switch/{}/power", self.endpoint, self.device))
            .json(&PowerReq { on })
            .send()
            .await
            .map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(Error::Device(format!("bridge: HTTP {}", resp.status())));
        }
        Ok(())
    }
}
