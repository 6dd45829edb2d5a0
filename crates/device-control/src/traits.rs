use crate::Result;
use async_trait::async_trait;

/// Pan/tilt camera with stored presets and still capture.
///
/// Implementations open a transient connection per call; the core holds no
/// persistent device handle.
#[async_trait]
pub trait CameraControl: Send + Sync {
    /// Move the camera by a relative pan/tilt offset in degrees.
    async fn move_relative(&self, pan_deg: f32, tilt_deg: f32) -> Result<()>;

    /// Capture a still image, returned as encoded image bytes.
    async fn capture_snapshot(&self) -> Result<Vec<u8>>;

    /// Recall a stored preset position by numeric id.
    ///
    /// A missing preset is [`crate::Error::PresetNotFound`], which the
    /// actuator reports as a recoverable step failure.
    async fn goto_preset(&self, index: u32) -> Result<()>;
}

/// On/off switchable device (smart lamp or relay plug).
#[async_trait]
pub trait PowerSwitch: Send + Sync {
    async fn set_power(&self, on: bool) -> Result<()>;
}
