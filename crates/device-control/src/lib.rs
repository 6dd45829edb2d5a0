//! device-control: capability traits for home devices and the sequential actuator
//!
//! Devices are reached through narrow capability traits (camera pan/tilt and
//! snapshots, switchable lamp and plug). The actuator walks a parsed compound
//! command left to right, converts every per-primitive failure into a
//! reported outcome entry, and never aborts the sequence. A brightness
//! fallback layer re-captures dark snapshots once with the lamp turned on.

mod error;
pub use error::{Error, Result};

mod traits;
pub use traits::{CameraControl, PowerSwitch};

mod outcome;
pub use outcome::{ActuationOutcome, StepOutcome};

mod snapshot;
pub use snapshot::SnapshotStore;

mod actuator;
pub use actuator::{DeviceActuator, PAN_TILT_STEP_DEG};

mod fallback;
pub use fallback::{mean_luma, DARK_LUMA_MAX};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockCamera, MockSwitch};

#[cfg(feature = "http-bridge")]
mod bridge;
#[cfg(feature = "http-bridge")]
pub use bridge::{BridgeCamera, BridgeSwitch};
