//! Configuration types for PDF-to-podcast generation.
//!
//! All generation behaviour is controlled through [`PodcastConfig`], built
//! via its [`PodcastConfigBuilder`]. The config is read once when the
//! pipeline is constructed; nothing in it is reloaded during a run.

use crate::error::PodcastError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default chat model, as used for all three text stages.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// Default speech model.
pub const DEFAULT_TTS_MODEL: &str = "tts-1";

/// Default OpenAI-compatible API root for speech synthesis.
pub const DEFAULT_SPEECH_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a PDF-to-podcast run.
///
/// Built via [`PodcastConfig::builder()`] or using [`PodcastConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2podcast::{PodcastConfig, Voice};
///
/// let config = PodcastConfig::builder()
///     .model("gpt-4.1-mini")
///     .voice(Voice::Nova)
///     .temperature(0.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PodcastConfig {
    /// Chat model identifier used by the summarize, key-point and script stages.
    pub model: String,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Speech-synthesis model identifier. Default: `tts-1`.
    pub tts_model: String,

    /// Narrator voice. Default: [`Voice::Alloy`].
    pub voice: Voice,

    /// Maximum tokens the LLM may generate per call. Default: 4000.
    pub max_tokens: usize,

    /// Sampling temperature for every LLM call. Default: 0.7.
    ///
    /// Podcast scripts benefit from some variety; transcription-style
    /// determinism is not the goal here.
    pub temperature: f32,

    /// API credential for the speech service. Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,

    /// Root URL of the OpenAI-compatible speech API.
    pub speech_base_url: String,

    /// Characters of source text sent to the summarize stage. Default: 10 000.
    ///
    /// Longer documents are cut hard at this length to stay inside the
    /// model's context window.
    pub summary_char_budget: usize,

    /// Maximum characters per speech request. Default: 4000.
    ///
    /// Scripts longer than this are split at sentence boundaries before
    /// synthesis. The OpenAI speech endpoint rejects inputs over 4096.
    pub speech_char_limit: usize,

    /// Shortest extracted text accepted by [`crate::generate_from_pdf`]. Default: 100.
    pub min_source_chars: usize,

    /// What the orchestrator does after a stage fails. Default: [`FailurePolicy::Continue`].
    pub on_failure: FailurePolicy,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional stage-level progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: None,
            provider: None,
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            voice: Voice::default(),
            max_tokens: 4000,
            temperature: 0.7,
            api_key: None,
            speech_base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            summary_char_budget: 10_000,
            speech_char_limit: 4000,
            min_source_chars: 100,
            on_failure: FailurePolicy::default(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PodcastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodcastConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("speech_base_url", &self.speech_base_url)
            .field("summary_char_budget", &self.summary_char_budget)
            .field("speech_char_limit", &self.speech_char_limit)
            .field("min_source_chars", &self.min_source_chars)
            .field("on_failure", &self.on_failure)
            .finish()
    }
}

impl PodcastConfig {
    /// Create a new builder for `PodcastConfig`.
    pub fn builder() -> PodcastConfigBuilder {
        PodcastConfigBuilder {
            config: Self::default(),
        }
    }

    /// The configured API key, or `OPENAI_API_KEY` from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

/// Builder for [`PodcastConfig`].
#[derive(Debug)]
pub struct PodcastConfigBuilder {
    config: PodcastConfig,
}

impl PodcastConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn tts_model(mut self, model: impl Into<String>) -> Self {
        self.config.tts_model = model.into();
        self
    }

    pub fn voice(mut self, voice: Voice) -> Self {
        self.config.voice = voice;
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn speech_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.speech_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn summary_char_budget(mut self, chars: usize) -> Self {
        self.config.summary_char_budget = chars;
        self
    }

    pub fn speech_char_limit(mut self, chars: usize) -> Self {
        self.config.speech_char_limit = chars;
        self
    }

    pub fn min_source_chars(mut self, chars: usize) -> Self {
        self.config.min_source_chars = chars;
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.on_failure = policy;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PodcastConfig, PodcastError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PodcastError::InvalidConfig("Model must not be empty".into()));
        }
        if c.tts_model.trim().is_empty() {
            return Err(PodcastError::InvalidConfig(
                "Speech model must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(PodcastError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.summary_char_budget == 0 {
            return Err(PodcastError::InvalidConfig(
                "summary_char_budget must be ≥ 1".into(),
            ));
        }
        if c.speech_char_limit < 2 {
            return Err(PodcastError::InvalidConfig(format!(
                "speech_char_limit must be ≥ 2, got {}",
                c.speech_char_limit
            )));
        }
        if !c.speech_base_url.starts_with("http://") && !c.speech_base_url.starts_with("https://") {
            return Err(PodcastError::InvalidConfig(format!(
                "speech_base_url must be an HTTP(S) URL, got '{}'",
                c.speech_base_url
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Narrator voices offered by the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    /// Wire name sent to the speech API.
    pub fn as_str(self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = PodcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Voice::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                PodcastError::InvalidConfig(format!(
                    "Unknown voice '{s}'; expected one of alloy, echo, fable, onyx, nova, shimmer"
                ))
            })
    }
}

/// How the orchestrator reacts to a failed stage.
///
/// `Continue` runs every remaining stage on whatever the failed stage left
/// behind (usually empty input). `Halt` returns right after the first
/// failure, leaving later fields at their initial values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Continue,
    Halt,
}
