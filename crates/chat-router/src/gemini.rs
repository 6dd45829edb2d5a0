//! Hosted generative-language classifier backend

use crate::{Classifier, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One generative-language model reached over REST.
///
/// Retry-by-model-swap lives in the router: build one `GeminiClassifier` per
/// model and hand the secondary to [`crate::Router::with_secondary`]; both
/// receive identical system instructions.
pub struct GeminiClassifier {
    base: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClassifier {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_base(DEFAULT_BASE, model, api_key)
    }

    pub fn with_base(
        base: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            base: base.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize)]
struct RespPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct RespContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<RespContent>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, system_instructions: &str, utterance: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base, self.model, self.api_key
        );
        let req = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instructions,
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: utterance }],
            }],
        };

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::Classifier(format!(
                "{}: HTTP {}",
                self.model,
                resp.status()
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Classifier(format!("{}: empty response", self.model)))?;
        tracing::debug!(model = %self.model, len = text.len(), "classifier responded");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
