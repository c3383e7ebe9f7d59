//! # edgequake-pdf2podcast
//!
//! Turn PDF documents into narrated podcast episodes.
//!
//! A language model condenses the document into a summary, pulls out its
//! key points and writes a conversational script; a speech service then
//! reads the script aloud. The result is an MP3 file plus the script text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 0. Extract    page text via pdfium (spawn_blocking)
//!  ├─ 1. Summarize  first 10 000 chars → prose summary      (LLM)
//!  ├─ 2. Points     summary → 5–7 key points, one per line  (LLM)
//!  ├─ 3. Script     summary + points → spoken script        (LLM)
//!  └─ 4. Audio      sentence-packed chunks → MP3 segments   (TTS)
//! ```
//!
//! Every stage runs to completion before the next starts. A failing stage
//! does not abort the run: its message lands in [`PipelineState::error`] and
//! the remaining stages still run (see [`FailurePolicy`] to change that).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2podcast::{generate_from_pdf, write_outputs, PodcastConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // LLM provider auto-detected; speech uses OPENAI_API_KEY
//!     let config = PodcastConfig::default();
//!     let state = generate_from_pdf("paper.pdf", &config).await?;
//!     if let Some(err) = state.error_message() {
//!         eprintln!("{err}");
//!     }
//!     println!("{}", state.summary);
//!     write_outputs(&state, "out").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Bring your own services
//!
//! The stages only see the [`LanguageModel`] and [`SpeechSynthesizer`]
//! traits. Build a [`PodcastPipeline`] with your own handles to use a
//! different backend, add caching, or script responses in tests.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2podcast` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod speech;
pub mod state;
pub mod text;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FailurePolicy, PodcastConfig, PodcastConfigBuilder, Voice};
pub use error::{PodcastError, ServiceError, StageError};
pub use generate::{
    generate, generate_from_bytes, generate_from_pdf, generate_sync, write_outputs, OutputFiles,
    PodcastPipeline,
};
pub use llm::{ChatModel, LanguageModel};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use speech::{OpenAiSpeech, SpeechSynthesizer};
pub use state::{PipelineState, Stage, Step};
