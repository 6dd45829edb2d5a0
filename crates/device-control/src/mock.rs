//! Mock device backends for development and testing

use crate::{CameraControl, Error, PowerSwitch, Result};
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

const BRIGHT_LEVEL: u8 = 170;
const DARK_LEVEL: u8 = 12;

/// In-memory pan/tilt camera producing flat gray test images.
pub struct MockCamera {
    brightness: u8,
    raw_snapshot: Option<Vec<u8>>,
    presets: Option<Vec<u32>>,
    fail_moves: bool,
    fail_snapshots: bool,
    snapshots: AtomicU32,
    moves: AtomicU32,
}

impl MockCamera {
    fn with_brightness(level: u8) -> Self {
        Self {
            brightness: level,
            raw_snapshot: None,
            presets: None,
            fail_moves: false,
            fail_snapshots: false,
            snapshots: AtomicU32::new(0),
            moves: AtomicU32::new(0),
        }
    }

    /// Camera whose snapshots are well above the dark threshold.
    pub fn bright() -> Self {
        Self::with_brightness(BRIGHT_LEVEL)
    }

    /// Camera whose snapshots are always too dark, even with the lamp on.
    pub fn dark() -> Self {
        Self::with_brightness(DARK_LEVEL)
    }

    /// Camera returning fixed raw bytes instead of an encoded image.
    pub fn with_raw_snapshot(bytes: Vec<u8>) -> Self {
        let mut cam = Self::with_brightness(BRIGHT_LEVEL);
        cam.raw_snapshot = Some(bytes);
        cam
    }

    /// Restrict the stored presets; unlisted indices report not-found.
    pub fn with_presets(mut self, presets: Vec<u32>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn with_failing_moves(mut self) -> Self {
        self.fail_moves = true;
        self
    }

    pub fn with_failing_snapshots(mut self) -> Self {
        self.fail_snapshots = true;
        self
    }

    /// Successful captures so far.
    pub fn snapshot_count(&self) -> u32 {
        self.snapshots.load(Ordering::SeqCst)
    }

    pub fn move_count(&self) -> u32 {
        self.moves.load(Ordering::SeqCst)
    }

    /// Encode a flat grayscale PNG at the given intensity.
    pub fn encode_gray(level: u8) -> Result<Vec<u8>> {
        let img = image::GrayImage::from_pixel(8, 8, image::Luma([level]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| Error::Decode(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

#[async_trait]
impl CameraControl for MockCamera {
    async fn move_relative(&self, pan_deg: f32, tilt_deg: f32) -> Result<()> {
        if self.fail_moves {
            return Err(Error::Device("camera offline".into()));
        }
        self.moves.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(pan_deg, tilt_deg, "mock camera move");
        Ok(())
    }

    async fn capture_snapshot(&self) -> Result<Vec<u8>> {
        if self.fail_snapshots {
            return Err(Error::Device("camera offline".into()));
        }
        let bytes = match &self.raw_snapshot {
            Some(raw) => raw.clone(),
            None => Self::encode_gray(self.brightness)?,
        };
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(bytes)
    }

    async fn goto_preset(&self, index: u32) -> Result<()> {
        if let Some(presets) = &self.presets {
            if !presets.contains(&index) {
                return Err(Error::PresetNotFound(index));
            }
        }
        Ok(())
    }
}

/// In-memory switchable device recording power calls.
pub struct MockSwitch {
    name: String,
    fail: bool,
    state: Mutex<Option<bool>>,
    calls: AtomicU32,
}

impl MockSwitch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            state: Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        let mut switch = Self::new(name);
        switch.fail = true;
        switch
    }

    pub fn power_calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Last power state set, if any call landed.
    pub fn last_state(&self) -> Option<bool> {
        self.state.lock().ok().and_then(|s| *s)
    }
}

#[async_trait]
impl PowerSwitch for MockSwitch {
    async fn set_power(&self, on: bool) -> Result<()> {
        if self.fail {
            return Err(Error::Device(format!("{} unreachable", self.name)));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut state) = self.state.lock() {
            *state = Some(on);
        }
        tracing::debug!(device = %self.name, on, "mock switch set");
        Ok(())
    }
}
