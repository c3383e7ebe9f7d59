//! Speech-synthesis seam and the OpenAI-compatible HTTP client.
//!
//! The audio stage talks to a [`SpeechSynthesizer`]; [`OpenAiSpeech`] is the
//! production implementation posting to `{base_url}/audio/speech`. Any
//! OpenAI-compatible server (a local TTS gateway, a proxy, a test double)
//! works by changing the base URL.

use crate::config::{PodcastConfig, Voice};
use crate::error::{PodcastError, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// A text-to-speech service returning encoded audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesise `text` and return the encoded audio bytes (MP3).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Client for the OpenAI `/audio/speech` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: Voice,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

impl OpenAiSpeech {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, voice: Voice) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: crate::config::DEFAULT_SPEECH_BASE_URL.into(),
            model: model.into(),
            voice,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a client from the speech fields of `config`.
    ///
    /// Fails with [`PodcastError::MissingApiKey`] when neither
    /// `config.api_key` nor `OPENAI_API_KEY` is set.
    pub fn from_config(config: &PodcastConfig) -> Result<Self, PodcastError> {
        let api_key = config.resolve_api_key().ok_or(PodcastError::MissingApiKey)?;
        Ok(Self::new(api_key, config.tts_model.clone(), config.voice)
            .with_base_url(config.speech_base_url.clone()))
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let body = SpeechRequest {
            model: &self.model,
            voice: self.voice.as_str(),
            input: text,
            response_format: "mp3",
        };

        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = body_or_note(resp.text().await);
            return Err(ServiceError::Api { status, message });
        }

        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(ServiceError::EmptyResponse("speech service"));
        }
        debug!("Speech call: {} chars in, {} bytes out", text.chars().count(), audio.len());

        Ok(audio.to_vec())
    }
}

/// The error body, or a note saying why it could not be read.
fn body_or_note<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
