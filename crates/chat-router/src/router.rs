//! Intent router: classify one utterance, dispatch, compose the reply

use crate::{
    compose_device_reply, parse_intent, CalendarLinks, Classifier, Intent, IntentResult,
    OutboundMessage, ShoppingLinks, WeatherLookup, SYSTEM_INSTRUCTIONS,
};
use device_control::DeviceActuator;
use std::sync::Arc;
use uuid::Uuid;

const SERVICE_UNAVAILABLE: &str = "服務暫時無法使用，請稍後再試";
const CLASSIFIER_DOWN: &str = "目前無法理解您的訊息，請稍後再試";
const UNKNOWN_HELP: &str = "我不太懂您的意思，試試「開燈」或「拍個照」";

enum ClassifyFailure {
    /// The call came back but carried no structured payload.
    Unparseable(String),
    CallFailed(String),
}

/// Stateless dispatcher for one utterance at a time.
///
/// Classification tolerates transient failure: when a secondary classifier
/// is configured, one retry against that alternate model (same system
/// instructions) runs before degrading to the unknown fallback. That model
/// swap is the only retry in the pipeline. Nothing here is fatal to a turn;
/// every path produces a reply.
pub struct Router {
    classifier: Arc<dyn Classifier>,
    secondary: Option<Arc<dyn Classifier>>,
    actuator: Arc<DeviceActuator>,
    weather: Option<Arc<dyn WeatherLookup>>,
    shopping: ShoppingLinks,
    calendar: CalendarLinks,
    snapshot_url: Option<String>,
}

impl Router {
    pub fn new(classifier: Arc<dyn Classifier>, actuator: Arc<DeviceActuator>) -> Self {
        Self {
            classifier,
            secondary: None,
            actuator,
            weather: None,
            shopping: ShoppingLinks::default(),
            calendar: CalendarLinks::default(),
            snapshot_url: None,
        }
    }

    /// Alternate model to retry against when the primary classification
    /// fails or is unparseable.
    pub fn with_secondary(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.secondary = Some(classifier);
        self
    }

    pub fn with_weather(mut self, weather: Arc<dyn WeatherLookup>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_shopping(mut self, shopping: ShoppingLinks) -> Self {
        self.shopping = shopping;
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarLinks) -> Self {
        self.calendar = calendar;
        self
    }

    /// Public URL the stored snapshot is served under.
    pub fn with_snapshot_url(mut self, url: impl Into<String>) -> Self {
        self.snapshot_url = Some(url.into());
        self
    }

    /// Turn one utterance into the ordered outbound reply.
    pub async fn route(&self, utterance: &str) -> Vec<OutboundMessage> {
        let request_id = Uuid::new_v4();
        tracing::info!(%request_id, utterance, "routing utterance");
        let result = self.classify(utterance).await;
        tracing::info!(%request_id, intent = ?result.intent, cmd = %result.cmd, "dispatching");

        match result.intent {
            Intent::Device => {
                let actions = action_grammar::parse(&result.cmd);
                let outcome = self.actuator.execute_with_fallback(&actions).await;
                compose_device_reply(&result.reply, &outcome, self.snapshot_url.as_deref())
            }
            Intent::Shopping => self.handle_shopping(&result),
            Intent::Calendar => self.handle_calendar(&result),
            Intent::Weather => self.handle_weather(&result).await,
            Intent::Unknown => {
                let reply = if result.reply.is_empty() {
                    UNKNOWN_HELP.to_string()
                } else {
                    result.reply
                };
                vec![OutboundMessage::Text(reply)]
            }
        }
    }

    async fn classify(&self, utterance: &str) -> IntentResult {
        let primary_failure = match attempt(self.classifier.as_ref(), utterance).await {
            Ok(result) => return result,
            Err(failure) => failure,
        };
        if let Some(secondary) = &self.secondary {
            tracing::warn!(
                model = secondary.model_name(),
                "primary classification failed, retrying with secondary model"
            );
            if let Ok(result) = attempt(secondary.as_ref(), utterance).await {
                return result;
            }
        }
        match primary_failure {
            ClassifyFailure::Unparseable(raw) => {
                tracing::warn!("classifier output not structured, echoing as-is");
                IntentResult::unknown(raw)
            }
            ClassifyFailure::CallFailed(e) => {
                tracing::error!("classification failed: {e}");
                IntentResult::unknown(CLASSIFIER_DOWN)
            }
        }
    }

    fn handle_shopping(&self, result: &IntentResult) -> Vec<OutboundMessage> {
        let links = self.shopping.links(&result.cmd);
        if links.is_empty() {
            return vec![OutboundMessage::Text(SERVICE_UNAVAILABLE.to_string())];
        }
        let mut text = String::new();
        if !result.reply.is_empty() {
            text.push_str(&result.reply);
        }
        for (name, url) in links {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&format!("{name}：{url}"));
        }
        vec![OutboundMessage::Text(text)]
    }

    fn handle_calendar(&self, result: &IntentResult) -> Vec<OutboundMessage> {
        let link = self.calendar.build(&result.cmd);
        let text = if result.reply.is_empty() {
            link
        } else {
            format!("{}\n{link}", result.reply)
        };
        vec![OutboundMessage::Text(text)]
    }

    async fn handle_weather(&self, result: &IntentResult) -> Vec<OutboundMessage> {
        let Some(weather) = &self.weather else {
            return vec![OutboundMessage::Text(SERVICE_UNAVAILABLE.to_string())];
        };
        match weather.current(&result.cmd).await {
            Ok(report) => vec![OutboundMessage::Text(report)],
            Err(e) => {
                tracing::warn!("weather lookup failed: {e}");
                vec![OutboundMessage::Text(SERVICE_UNAVAILABLE.to_string())]
            }
        }
    }
}

async fn attempt(
    classifier: &dyn Classifier,
    utterance: &str,
) -> Result<IntentResult, ClassifyFailure> {
    match classifier.classify(SYSTEM_INSTRUCTIONS, utterance).await {
        Ok(raw) => parse_intent(&raw).ok_or(ClassifyFailure::Unparseable(raw)),
        Err(e) => Err(ClassifyFailure::CallFailed(e.to_string())),
    }
}
