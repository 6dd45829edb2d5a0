use serde::{Deserialize, Serialize};

/// Classified purpose of one utterance. Closed set; anything the classifier
/// produces outside it collapses to [`Intent::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Device,
    Shopping,
    Calendar,
    Weather,
    Unknown,
}

/// One classification outcome: the intent, the payload the matching handler
/// consumes (`cmd`), and the conversational reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResult {
    pub intent: Intent,
    pub cmd: String,
    pub reply: String,
}

impl IntentResult {
    /// Degraded result carrying best-effort diagnostic text as the reply.
    pub fn unknown(reply: impl Into<String>) -> Self {
        Self {
            intent: Intent::Unknown,
            cmd: String::new(),
            reply: reply.into(),
        }
    }
}

/// One outbound reply segment, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    /// URL of an image to attach.
    Image(String),
}
