//! Offline classifier and lookup backends for development and testing

use crate::{Classifier, Error, Result, WeatherLookup};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

enum Rule {
    /// Fixed device command with a canned confirmation.
    Device(&'static str, &'static str),
    /// Remainder of the utterance after the trigger becomes `cmd`.
    Shopping,
    Calendar,
    Weather,
}

/// Keyword-pattern classifier producing the same wire shape as the hosted
/// model. Default no-network mode and the test double for the router.
pub struct KeywordClassifier {
    rules: Vec<(Regex, Rule)>,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self> {
        let table: Vec<(&str, Rule)> = vec![
            (r"(?i)開燈|lamp\s*on", Rule::Device("lamp+on", "已開燈")),
            (r"(?i)關燈|lamp\s*off", Rule::Device("lamp+off", "已關燈")),
            (r"(?i)開插座|plug\s*on", Rule::Device("plug+on", "插座已開")),
            (r"(?i)關插座|plug\s*off", Rule::Device("plug+off", "插座已關")),
            (r"(?i)拍|照片|snapshot|photo|picture", Rule::Device("snapshot", "正在拍照...")),
            (r"(?i)左|\bleft\b", Rule::Device("left", "鏡頭左轉")),
            (r"(?i)右|\bright\b", Rule::Device("right", "鏡頭右轉")),
            (r"(?i)上|\bup\b", Rule::Device("up", "鏡頭上轉")),
            (r"(?i)下|\bdown\b", Rule::Device("down", "鏡頭下轉")),
            (r"(?i)天氣|weather", Rule::Weather),
            (r"(?i)行事曆|日曆|calendar|schedule", Rule::Calendar),
            (r"(?i)買|購|buy|shop", Rule::Shopping),
        ];
        let mut rules = Vec::with_capacity(table.len());
        for (pattern, rule) in table {
            let regex = Regex::new(pattern).map_err(|e| Error::Classifier(e.to_string()))?;
            rules.push((regex, rule));
        }
        Ok(Self { rules })
    }

    fn classify_text(&self, utterance: &str) -> String {
        for (regex, rule) in &self.rules {
            let Some(found) = regex.find(utterance) else {
                continue;
            };
            let payload = match rule {
                Rule::Device(cmd, reply) => {
                    json!({"type": "device", "cmd": cmd, "reply": reply})
                }
                Rule::Shopping => {
                    let keyword = strip_trigger(utterance, found.range());
                    json!({"type": "shopping", "cmd": keyword, "reply": "幫您找了幾個賣場"})
                }
                Rule::Calendar => {
                    let query = strip_trigger(utterance, found.range());
                    json!({"type": "calendar", "cmd": query, "reply": "建立行事曆連結"})
                }
                Rule::Weather => {
                    let location = strip_trigger(utterance, found.range());
                    json!({"type": "weather", "cmd": location, "reply": "查詢天氣中..."})
                }
            };
            return payload.to_string();
        }
        json!({
            "type": "unknown",
            "cmd": "",
            "reply": format!("你說：{utterance}"),
        })
        .to_string()
    }
}

fn strip_trigger(utterance: &str, matched: std::ops::Range<usize>) -> String {
    let mut rest = String::with_capacity(utterance.len());
    rest.push_str(&utterance[..matched.start]);
    rest.push_str(&utterance[matched.end..]);
    let rest = rest.trim();
    if rest.is_empty() {
        utterance.trim().to_string()
    } else {
        rest.to_string()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, _system_instructions: &str, utterance: &str) -> Result<String> {
        Ok(self.classify_text(utterance))
    }

    fn model_name(&self) -> &str {
        "keyword-heuristic"
    }
}

/// Classifier replaying scripted responses, in order.
pub struct ScriptedClassifier {
    name: String,
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicU32,
}

impl ScriptedClassifier {
    pub fn replying(name: &str, responses: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.to_string())).collect()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _system_instructions: &str, _utterance: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front());
        match next {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(e)) => Err(Error::Classifier(e)),
            None => Err(Error::Classifier("no scripted response left".into())),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Weather collaborator returning a fixed report.
pub struct CannedWeather {
    report: Option<String>,
}

impl CannedWeather {
    pub fn new(report: &str) -> Self {
        Self {
            report: Some(report.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self { report: None }
    }
}

#[async_trait]
impl WeatherLookup for CannedWeather {
    async fn current(&self, location: &str) -> Result<String> {
        match &self.report {
            Some(report) => Ok(format!("{location}: {report}")),
            None => Err(Error::Lookup("weather service unavailable".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_intent, Intent};

    fn classify(utterance: &str) -> Intent {
        let classifier = match KeywordClassifier::new() {
            Ok(c) => c,
            Err(e) => panic!("build classifier: {e}"),
        };
        match parse_intent(&classifier.classify_text(utterance)) {
            Some(result) => result.intent,
            None => panic!("keyword classifier emitted unparseable output"),
        }
    }

    #[test]
    fn keyword_rules_cover_the_intent_set() {
        assert_eq!(classify("幫我開燈"), Intent::Device);
        assert_eq!(classify("拍個照"), Intent::Device);
        assert_eq!(classify("台北天氣如何"), Intent::Weather);
        assert_eq!(classify("我想買咖啡豆"), Intent::Shopping);
        assert_eq!(classify("加入行事曆"), Intent::Calendar);
        assert_eq!(classify("哈囉"), Intent::Unknown);
    }

    #[test]
    fn unknown_echoes_the_utterance() {
        let classifier = match KeywordClassifier::new() {
            Ok(c) => c,
            Err(e) => panic!("build classifier: {e}"),
        };
        let parsed = parse_intent(&classifier.classify_text("哈囉"));
        let reply = parsed.map(|p| p.reply).unwrap_or_default();
        assert_eq!(reply, "你說：哈囉");
    }
}
