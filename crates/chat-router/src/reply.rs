//! Outbound reply assembly

use crate::OutboundMessage;
use device_control::ActuationOutcome;

const COMPENSATION_NOTICE: &str = "畫面太暗，已自動開燈重拍一張";

/// Build the ordered reply for a device-intent turn.
///
/// Order is fixed: primary text, then the compensation notice when the
/// brightness fallback ran, then the snapshot image. The primary text is the
/// classifier's reply when it gave one, otherwise the outcome summary; a
/// summary with failures is appended after the reply so partial failures are
/// never hidden.
pub fn compose_device_reply(
    reply: &str,
    outcome: &ActuationOutcome,
    image_url: Option<&str>,
) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();

    let summary = outcome.summary();
    let all_ok = outcome.steps().iter().all(|s| s.ok);
    if reply.is_empty() {
        messages.push(OutboundMessage::Text(summary));
    } else if all_ok {
        messages.push(OutboundMessage::Text(reply.to_string()));
    } else {
        messages.push(OutboundMessage::Text(format!("{reply}\n({summary})")));
    }

    if outcome.has_compensation() {
        messages.push(OutboundMessage::Text(COMPENSATION_NOTICE.to_string()));
    }

    if outcome.snapshot_captured() {
        if let Some(url) = image_url {
            messages.push(OutboundMessage::Image(url.to_string()));
        } else {
            tracing::warn!("snapshot captured but no public image URL configured");
        }
    }

    messages
}
