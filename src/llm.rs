//! Language-model seam for the three text stages.
//!
//! Stages depend on the small [`LanguageModel`] trait rather than on
//! `edgequake_llm` directly, so tests can script responses and callers can
//! inject any backend. [`ChatModel`] is the production implementation: it
//! sends the prompt as a single user message through an
//! [`edgequake_llm::LLMProvider`].

use crate::config::PodcastConfig;
use crate::error::{PodcastError, ServiceError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, OpenAIProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// A text-completion service.
///
/// One long-lived handle is constructed by the caller and shared read-only
/// across every stage of a run.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// [`LanguageModel`] backed by an `edgequake_llm` chat provider.
pub struct ChatModel {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            options: build_options(temperature, max_tokens),
        }
    }

    /// Resolve a provider from `config` (see [`resolve_provider`]) and wrap it.
    pub fn from_config(config: &PodcastConfig) -> Result<Self, PodcastError> {
        let provider = resolve_provider(config)?;
        Ok(Self::new(provider, config.temperature, config.max_tokens))
    }
}

#[async_trait]
impl LanguageModel for ChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| ServiceError::Provider(e.to_string()))?;

        debug!(
            "LLM call: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        Ok(response.content)
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model`.
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`.
/// 4. **OpenAI** with `config.api_key`, the same credential the speech
///    client uses, or with `OPENAI_API_KEY`; model `config.model`.
/// 5. **Full auto-detection** via `ProviderFactory::from_env`.
pub fn resolve_provider(config: &PodcastConfig) -> Result<Arc<dyn LLMProvider>, PodcastError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, &config.model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
        debug!("Using OpenAI provider with the configured API key");
        return Ok(Arc::new(OpenAIProvider::new(key).with_model(config.model.as_str())));
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", &config.model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PodcastError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

/// Sampling options shared by every call a [`ChatModel`] makes.
fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PodcastError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PodcastError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
