//! Pipeline orchestration and the top-level generation entry points.
//!
//! [`PodcastPipeline`] owns one language-model handle and one speech handle
//! for its whole life and runs the four stages strictly in order. Each stage
//! returns a typed `Result`; the orchestrator folds it into the
//! [`PipelineState`] and consults [`FailurePolicy`] before moving on.
//!
//! Failures inside a stage never escape as `Err`. Only problems that stop a
//! run from starting at all (no provider, no API key, unreadable PDF, too
//! little text) are returned as [`PodcastError`].

use crate::config::{FailurePolicy, PodcastConfig};
use crate::error::{PodcastError, StageError};
use crate::llm::{ChatModel, LanguageModel};
use crate::pipeline::audio::{self, SynthesizedAudio};
use crate::pipeline::{extract, key_points, script, summarize};
use crate::speech::{OpenAiSpeech, SpeechSynthesizer};
use crate::state::{PipelineState, Stage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// File name of the combined audio written by [`write_outputs`].
pub const AUDIO_FILE_NAME: &str = "podcast.mp3";

/// File name of the script written by [`write_outputs`].
pub const SCRIPT_FILE_NAME: &str = "podcast_script.txt";

/// The four-stage document-to-podcast pipeline.
pub struct PodcastPipeline {
    language_model: Arc<dyn LanguageModel>,
    speech: Arc<dyn SpeechSynthesizer>,
    config: PodcastConfig,
}

/// Successful output of one stage, applied to the state by the orchestrator.
enum StageOutput {
    Summary(String),
    KeyPoints(Vec<String>),
    Script(String),
    Audio(SynthesizedAudio),
}

impl StageOutput {
    fn apply(self, state: PipelineState) -> PipelineState {
        match self {
            StageOutput::Summary(s) => state.with_summary(s),
            StageOutput::KeyPoints(points) => state.with_key_points(points),
            StageOutput::Script(s) => state.with_script(s),
            StageOutput::Audio(a) => state.with_audio(a.segments, a.combined),
        }
    }
}

impl PodcastPipeline {
    /// Build a pipeline around caller-supplied service handles.
    pub fn new(
        language_model: Arc<dyn LanguageModel>,
        speech: Arc<dyn SpeechSynthesizer>,
        config: PodcastConfig,
    ) -> Self {
        Self {
            language_model,
            speech,
            config,
        }
    }

    /// Build a pipeline with a [`ChatModel`] and an [`OpenAiSpeech`] client
    /// derived from `config`.
    pub fn from_config(config: PodcastConfig) -> Result<Self, PodcastError> {
        let language_model = ChatModel::from_config(&config)?;
        let speech = OpenAiSpeech::from_config(&config)?;
        Ok(Self::new(Arc::new(language_model), Arc::new(speech), config))
    }

    pub fn config(&self) -> &PodcastConfig {
        &self.config
    }

    /// Run all four stages over `source_text`.
    ///
    /// Always returns a complete state. With [`FailurePolicy::Continue`]
    /// every stage runs even after an earlier one failed, feeding on the
    /// empty fields the failure left behind; `error` then holds the last
    /// failure. With [`FailurePolicy::Halt`] the run stops at the first
    /// failure.
    pub async fn run(&self, source_text: impl Into<String>) -> PipelineState {
        let run_start = Instant::now();
        let mut state = PipelineState::new(source_text);
        let source_chars = state.source_text.chars().count();
        info!("Starting podcast generation: {} chars of source text", source_chars);

        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_pipeline_start(source_chars);
        }

        let mut failed = 0usize;
        for stage in Stage::ALL {
            if failed > 0 && self.config.on_failure == FailurePolicy::Halt {
                info!("Halting after failed stage; skipping {}", stage);
                break;
            }

            info!("Step {}: {}...", stage.number(), stage.description());
            if let Some(cb) = cb {
                cb.on_stage_start(stage);
            }

            let stage_start = Instant::now();
            let outcome = self.execute(stage, &state).await;
            state = match outcome {
                Ok(output) => {
                    debug!("{} finished in {}ms", stage, stage_start.elapsed().as_millis());
                    if let Some(cb) = cb {
                        cb.on_stage_complete(stage);
                    }
                    output.apply(state)
                }
                Err(e) => {
                    warn!("{}", e);
                    failed += 1;
                    if let Some(cb) = cb {
                        cb.on_stage_error(stage, &e.to_string());
                    }
                    state.with_error(e)
                }
            };
        }

        info!(
            "Podcast generation finished at {} with {} failed stage(s) in {}ms",
            state.current_step,
            failed,
            run_start.elapsed().as_millis()
        );
        if let Some(cb) = cb {
            cb.on_pipeline_complete(failed);
        }

        state
    }

    /// Synchronous wrapper around [`PodcastPipeline::run`].
    ///
    /// Creates a temporary tokio runtime internally; do not call from inside
    /// an async context.
    pub fn run_sync(&self, source_text: impl Into<String>) -> Result<PipelineState, PodcastError> {
        Ok(new_runtime()?.block_on(self.run(source_text)))
    }

    async fn execute(&self, stage: Stage, state: &PipelineState) -> Result<StageOutput, StageError> {
        let model = self.language_model.as_ref();
        match stage {
            Stage::Summarize => summarize::summarize(
                model,
                &state.source_text,
                self.config.summary_char_budget,
            )
            .await
            .map(StageOutput::Summary),
            Stage::KeyPoints => key_points::extract_key_points(model, &state.summary)
                .await
                .map(StageOutput::KeyPoints),
            Stage::Script => script::generate_script(model, &state.summary, &state.key_points)
                .await
                .map(StageOutput::Script),
            Stage::Audio => audio::synthesize_script(
                self.speech.as_ref(),
                &state.script,
                self.config.speech_char_limit,
                self.config.progress_callback.as_ref(),
            )
            .await
            .map(StageOutput::Audio),
        }
    }
}

/// Generate a podcast from raw document text.
///
/// # Errors
/// Returns `Err(PodcastError)` only when the pipeline cannot be built (no
/// LLM provider, no speech API key). Stage failures are reported through
/// [`PipelineState::error`].
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2podcast::{generate, PodcastConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let text = std::fs::read_to_string("paper.txt")?;
/// let state = generate(text, &PodcastConfig::default()).await?;
/// if let Some(err) = state.error_message() {
///     eprintln!("{err}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate(
    source_text: impl Into<String>,
    config: &PodcastConfig,
) -> Result<PipelineState, PodcastError> {
    let pipeline = PodcastPipeline::from_config(config.clone())?;
    Ok(pipeline.run(source_text).await)
}

/// Synchronous wrapper around [`generate`].
pub fn generate_sync(
    source_text: impl Into<String>,
    config: &PodcastConfig,
) -> Result<PipelineState, PodcastError> {
    new_runtime()?.block_on(generate(source_text, config))
}

/// Extract the text of a PDF file and generate a podcast from it.
///
/// # Errors
/// Besides the errors of [`generate`], fails when the file cannot be read
/// as a PDF or yields fewer than `config.min_source_chars` characters.
pub async fn generate_from_pdf(
    path: impl AsRef<Path>,
    config: &PodcastConfig,
) -> Result<PipelineState, PodcastError> {
    let path = path.as_ref();
    info!("Extracting text from {}", path.display());
    let text = extract::extract_text(path, config.password.as_deref()).await?;
    check_source_length(&text, config.min_source_chars)?;
    generate(text, config).await
}

/// Like [`generate_from_pdf`] for a PDF already held in memory.
pub async fn generate_from_bytes(
    bytes: Vec<u8>,
    config: &PodcastConfig,
) -> Result<PipelineState, PodcastError> {
    let text = extract::extract_text_from_bytes(bytes, config.password.as_deref()).await?;
    check_source_length(&text, config.min_source_chars)?;
    generate(text, config).await
}

/// Reject text too short to make a podcast from.
pub fn check_source_length(text: &str, min_chars: usize) -> Result<(), PodcastError> {
    let chars = text.chars().count();
    if chars < min_chars {
        return Err(PodcastError::InsufficientText {
            chars,
            min: min_chars,
        });
    }
    Ok(())
}

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    pub audio: Option<PathBuf>,
    pub script: Option<PathBuf>,
}

/// Write the run's deliverables into `dir`.
///
/// `podcast.mp3` is written when `final_audio` is set and
/// `podcast_script.txt` when the script is non-empty. Each file goes to a
/// temporary name first and is renamed into place, so a crash never leaves a
/// truncated file behind.
pub async fn write_outputs(
    state: &PipelineState,
    dir: impl AsRef<Path>,
) -> Result<OutputFiles, PodcastError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PodcastError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = OutputFiles::default();

    if let Some(ref audio) = state.final_audio {
        let path = dir.join(AUDIO_FILE_NAME);
        write_atomic(&path, audio).await?;
        written.audio = Some(path);
    }

    if !state.script.is_empty() {
        let path = dir.join(SCRIPT_FILE_NAME);
        write_atomic(&path, state.script.as_bytes()).await?;
        written.script = Some(path);
    }

    Ok(written)
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PodcastError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| PodcastError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PodcastError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn new_runtime() -> Result<tokio::runtime::Runtime, PodcastError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PodcastError::Internal(format!("Failed to create tokio runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_rejected() {
        let err = check_source_length("too short", 100).unwrap_err();
        assert!(matches!(
            err,
            PodcastError::InsufficientText { chars: 9, min: 100 }
        ));
        assert!(check_source_length(&"x".repeat(100), 100).is_ok());
    }

    #[test]
    fn length_check_counts_characters() {
        // 60 chars, 120 bytes.
        assert!(check_source_length(&"ü".repeat(60), 100).is_err());
    }

    #[test]
    fn pipeline_builds_from_api_key_alone() {
        for var in ["OPENAI_API_KEY", "EDGEQUAKE_LLM_PROVIDER", "EDGEQUAKE_MODEL"] {
            std::env::remove_var(var);
        }
        let config = PodcastConfig::builder()
            .api_key("sk-explicit")
            .build()
            .unwrap();
        let pipeline = PodcastPipeline::from_config(config).unwrap();
        assert_eq!(pipeline.config().api_key.as_deref(), Some("sk-explicit"));
    }

    #[tokio::test]
    async fn writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let state = PipelineState::new("doc")
            .with_script("Welcome to the show.".into())
            .with_audio(vec![vec![1, 2, 3]], vec![1, 2, 3]);

        let written = write_outputs(&state, dir.path()).await.unwrap();

        let audio = written.audio.unwrap();
        let script = written.script.unwrap();
        assert_eq!(audio, dir.path().join("podcast.mp3"));
        assert_eq!(std::fs::read(&audio).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            std::fs::read_to_string(&script).unwrap(),
            "Welcome to the show."
        );
        assert!(!dir.path().join("podcast.mp3.tmp").exists());
    }

    #[tokio::test]
    async fn skips_missing_audio() {
        let dir = tempfile::tempdir().unwrap();
        let state = PipelineState::new("doc").with_script("Script only.".into());

        let written = write_outputs(&state, dir.path().join("nested")).await.unwrap();

        assert!(written.audio.is_none());
        assert!(written.script.is_some());
        assert!(!dir.path().join("nested").join(AUDIO_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn empty_state_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_outputs(&PipelineState::new("doc"), dir.path())
            .await
            .unwrap();
        assert_eq!(written, OutputFiles::default());
    }
}
