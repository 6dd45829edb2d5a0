//! Sequential executor for compound commands

use crate::{ActuationOutcome, CameraControl, Error, PowerSwitch, SnapshotStore};
use action_grammar::{CompoundAction, DeviceClass, Token};
use std::sync::Arc;

/// Fixed per-step pan/tilt move, in degrees.
pub const PAN_TILT_STEP_DEG: f32 = 15.0;

/// Drives the three device classes for one compound command at a time.
///
/// Execution is strictly sequential, left to right: the primitives share one
/// physical camera motor and must not interleave. A device-class token sets
/// the ambient class that following bare power tokens resolve against; with
/// no class named, power defaults to the plug.
pub struct DeviceActuator {
    camera: Arc<dyn CameraControl>,
    lamp: Arc<dyn PowerSwitch>,
    plug: Arc<dyn PowerSwitch>,
    snapshots: Arc<SnapshotStore>,
}

impl DeviceActuator {
    pub fn new(
        camera: Arc<dyn CameraControl>,
        lamp: Arc<dyn PowerSwitch>,
        plug: Arc<dyn PowerSwitch>,
        snapshots: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            camera,
            lamp,
            plug,
            snapshots,
        }
    }

    pub fn snapshots(&self) -> &Arc<SnapshotStore> {
        &self.snapshots
    }

    /// Execute every primitive in order, one outcome entry per primitive.
    ///
    /// A failing step is recorded as an error detail and the walk continues;
    /// one bad step never aborts the compound sequence.
    pub async fn execute(&self, actions: &CompoundAction) -> ActuationOutcome {
        let mut outcome = ActuationOutcome::new();
        if !actions.has_actionable() {
            outcome.push_err("none", "no valid action");
            return outcome;
        }

        // Fold over tokens carrying (ambient class, outcome so far).
        let mut ambient: Option<DeviceClass> = None;
        for token in actions {
            match token {
                Token::Snapshot => self.do_snapshot(&mut outcome).await,
                Token::Motion(dir) => {
                    let (dx, dy) = dir.offsets();
                    match self
                        .camera
                        .move_relative(dx * PAN_TILT_STEP_DEG, dy * PAN_TILT_STEP_DEG)
                        .await
                    {
                        Ok(()) => outcome.push_ok("camera", dir.as_str()),
                        Err(e) => outcome.push_err("camera", format!("move failed: {e}")),
                    }
                }
                Token::Preset(idx) => match self.camera.goto_preset(*idx).await {
                    Ok(()) => outcome.push_ok("camera", format!("preset {idx}")),
                    Err(Error::PresetNotFound(_)) => {
                        outcome.push_err("camera", "preset not found");
                    }
                    Err(e) => outcome.push_err("camera", format!("preset failed: {e}")),
                },
                Token::Power(state) => {
                    let class = ambient.unwrap_or(DeviceClass::Plug);
                    let switch = match class {
                        DeviceClass::Lamp => &self.lamp,
                        DeviceClass::Plug => &self.plug,
                    };
                    match switch.set_power(state.is_on()).await {
                        Ok(()) => outcome.push_ok(class.as_str(), state.as_str()),
                        Err(e) => outcome.push_err(class.as_str(), format!("power failed: {e}")),
                    }
                }
                Token::DeviceClass(class) => {
                    // Sets context for following power tokens; not an outcome step.
                    ambient = Some(*class);
                }
                Token::Unrecognized(raw) => outcome.push_err(raw.clone(), "unsupported"),
            }
        }
        tracing::info!(steps = outcome.len(), summary = %outcome.summary(), "compound command executed");
        outcome
    }

    async fn do_snapshot(&self, outcome: &mut ActuationOutcome) {
        match self.camera.capture_snapshot().await {
            Ok(bytes) => match self.snapshots.write(&bytes).await {
                Ok(()) => outcome.push_ok("camera", "captured"),
                Err(e) => outcome.push_err("camera", format!("snapshot failed: {e}")),
            },
            Err(e) => outcome.push_err("camera", format!("snapshot failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockCamera, MockSwitch};
    use action_grammar::parse;

    fn actuator_with(
        camera: MockCamera,
    ) -> (
        DeviceActuator,
        Arc<MockSwitch>,
        Arc<MockSwitch>,
        tempfile::TempDir,
    ) {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };
        let lamp = Arc::new(MockSwitch::new("lamp"));
        let plug = Arc::new(MockSwitch::new("plug"));
        let actuator = DeviceActuator::new(
            Arc::new(camera),
            lamp.clone(),
            plug.clone(),
            Arc::new(SnapshotStore::new(dir.path().join("latest.jpg"))),
        );
        (actuator, lamp, plug, dir)
    }

    #[tokio::test]
    async fn named_lamp_resolves_power_to_lamp() {
        let (actuator, lamp, plug, _dir) = actuator_with(MockCamera::bright());
        let outcome = actuator.execute(&parse("lamp+on")).await;
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.steps()[0].label, "lamp");
        assert_eq!(outcome.steps()[0].detail, "on");
        assert_eq!(lamp.power_calls(), 1);
        assert_eq!(plug.power_calls(), 0);
    }

    #[tokio::test]
    async fn bare_power_defaults_to_plug() {
        let (actuator, lamp, plug, _dir) = actuator_with(MockCamera::bright());
        let outcome = actuator.execute(&parse("on")).await;
        assert_eq!(outcome.steps()[0].label, "plug");
        assert_eq!(plug.power_calls(), 1);
        assert_eq!(lamp.power_calls(), 0);
    }

    #[tokio::test]
    async fn ambient_class_persists_across_power_tokens() {
        let (actuator, _lamp, plug, _dir) = actuator_with(MockCamera::bright());
        let outcome = actuator.execute(&parse("plug+off+on")).await;
        assert_eq!(outcome.len(), 2);
        assert!(outcome.steps().iter().all(|s| s.label == "plug"));
        assert_eq!(plug.power_calls(), 2);
    }

    #[tokio::test]
    async fn middle_failure_keeps_all_entries_in_order() {
        let camera = MockCamera::bright().with_failing_moves();
        let (actuator, _lamp, _plug, _dir) = actuator_with(camera);
        let outcome = actuator.execute(&parse("snapshot+left+snapshot")).await;
        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.steps()[0].detail, "captured");
        assert!(!outcome.steps()[1].ok);
        assert!(outcome.steps()[1].detail.starts_with("move failed"));
        assert_eq!(outcome.steps()[2].detail, "captured");
    }

    #[tokio::test]
    async fn missing_preset_is_reported_and_sequence_continues() {
        let camera = MockCamera::bright().with_presets(vec![1, 2]);
        let (actuator, _lamp, _plug, _dir) = actuator_with(camera);
        let outcome = actuator.execute(&parse("goto_preset_9+right")).await;
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.steps()[0].detail, "preset not found");
        assert_eq!(outcome.steps()[1].detail, "right");
    }

    #[tokio::test]
    async fn empty_and_unrecognized_only_report_no_valid_action() {
        let (actuator, _lamp, _plug, _dir) = actuator_with(MockCamera::bright());
        let outcome = actuator.execute(&parse("")).await;
        assert_eq!(outcome.summary(), "no valid action");
        let outcome = actuator.execute(&parse("dance+sing")).await;
        assert_eq!(outcome.summary(), "no valid action");
    }

    #[tokio::test]
    async fn unrecognized_token_in_mixed_sequence_is_unsupported() {
        let (actuator, _lamp, _plug, _dir) = actuator_with(MockCamera::bright());
        let outcome = actuator.execute(&parse("left+dance")).await;
        assert_eq!(outcome.summary(), "left; unsupported");
    }
}
