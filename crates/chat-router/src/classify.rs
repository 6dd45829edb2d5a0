//! Classifier seam and defensive parsing of its output

use crate::{Intent, IntentResult, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Fixed instructions sent with every classification call, describing the
/// intent set and the device command sub-vocabulary.
pub const SYSTEM_INSTRUCTIONS: &str = "\
You classify one smart-home chat message. Respond with ONLY a JSON object \
{\"type\": ..., \"cmd\": ..., \"reply\": ...} and no other text.\n\
type is one of: device, shopping, calendar, weather, unknown.\n\
For device, cmd is a `+`-joined sequence of: snapshot, left, right, up, \
down, goto_preset_<n>, lamp, plug, on, off. A lamp/plug token names the \
device for the on/off tokens after it. Examples: \"lamp+on\", \
\"right+snapshot\", \"goto_preset_2\".\n\
For shopping, cmd is the product keyword. For calendar, cmd is the event \
query. For weather, cmd is the location.\n\
reply is a short confirmation in the user's own language. For unknown, \
leave cmd empty and put your conversational answer in reply.";

/// Hosted or local model turning an utterance into raw classifier text.
///
/// The raw text is parsed defensively by [`parse_intent`]; implementations
/// never need to guarantee well-formed output.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, system_instructions: &str, utterance: &str) -> Result<String>;

    /// Model identifier for logs.
    fn model_name(&self) -> &str;
}

#[derive(Deserialize)]
struct IntentWire {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    cmd: String,
    #[serde(default)]
    reply: String,
}

/// Parse raw classifier output into an [`IntentResult`].
///
/// Tries a direct JSON parse, then the first-`{`-to-last-`}` substring
/// (models wrap the payload in prose or code fences more often than not).
/// Returns `None` only when no structured payload can be extracted; an
/// unexpected `type` string still parses, degraded to [`Intent::Unknown`].
pub fn parse_intent(raw: &str) -> Option<IntentResult> {
    let wire: IntentWire = match serde_json::from_str(raw) {
        Ok(wire) => wire,
        Err(_) => {
            let start = raw.find('{')?;
            let end = raw.rfind('}')?;
            if end <= start {
                return None;
            }
            serde_json::from_str(&raw[start..=end]).ok()?
        }
    };

    let intent = match wire.kind.as_str() {
        "device" => Intent::Device,
        "shopping" => Intent::Shopping,
        "calendar" => Intent::Calendar,
        "weather" => Intent::Weather,
        "unknown" => Intent::Unknown,
        other => {
            tracing::warn!(kind = other, "unexpected intent type from classifier");
            Intent::Unknown
        }
    };
    Some(IntentResult {
        intent,
        cmd: wire.cmd,
        reply: wire.reply,
    })
}
