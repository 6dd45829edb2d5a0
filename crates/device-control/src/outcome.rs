use serde::{Deserialize, Serialize};

/// Result of one executed primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Which device (or raw token) the step acted on.
    pub label: String,
    /// Short status or error text for the step.
    pub detail: String,
    /// Whether the step succeeded at the device.
    pub ok: bool,
    /// Set on steps synthesized by the brightness fallback.
    pub compensation: bool,
}

/// Ordered per-primitive results for one compound command.
///
/// Entries are appended for every executed primitive, error or not; partial
/// failure never discards earlier or later entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActuationOutcome {
    steps: Vec<StepOutcome>,
}

impl ActuationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&mut self, label: impl Into<String>, detail: impl Into<String>) {
        self.steps.push(StepOutcome {
            label: label.into(),
            detail: detail.into(),
            ok: true,
            compensation: false,
        });
    }

    pub fn push_err(&mut self, label: impl Into<String>, detail: impl Into<String>) {
        self.steps.push(StepOutcome {
            label: label.into(),
            detail: detail.into(),
            ok: false,
            compensation: false,
        });
    }

    /// Append another outcome's steps, marking them as fallback compensation.
    pub fn append_compensation(&mut self, other: ActuationOutcome) {
        for mut step in other.steps {
            step.compensation = true;
            self.steps.push(step);
        }
    }

    pub fn steps(&self) -> &[StepOutcome] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn has_compensation(&self) -> bool {
        self.steps.iter().any(|s| s.compensation)
    }

    /// True when a snapshot step reached the device and was persisted.
    pub fn snapshot_captured(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.label == "camera" && s.detail == "captured" && s.ok)
    }

    /// `; `-joined step details, in execution order.
    pub fn summary(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_joins_details_in_order() {
        let mut outcome = ActuationOutcome::new();
        outcome.push_ok("camera", "left");
        outcome.push_err("camera", "move failed: offline");
        outcome.push_ok("camera", "captured");
        assert_eq!(outcome.summary(), "left; move failed: offline; captured");
    }

    #[test]
    fn compensation_steps_are_tagged() {
        let mut primary = ActuationOutcome::new();
        primary.push_ok("camera", "captured");
        let mut extra = ActuationOutcome::new();
        extra.push_ok("lamp", "on");
        primary.append_compensation(extra);
        assert!(primary.has_compensation());
        assert!(!primary.steps()[0].compensation);
        assert!(primary.steps()[1].compensation);
    }
}
