//! The record threaded through the four pipeline stages.
//!
//! [`PipelineState`] is consumed and returned by value at every step: the
//! orchestrator in [`crate::generate`] takes the previous state, applies one
//! stage's typed outcome through a `with_*` method, and hands the new state
//! to the next stage. No stage holds a mutable reference to shared state.

use crate::error::StageError;
use serde::{Serialize, Serializer};
use std::fmt;

/// One step of the fixed pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Summarize,
    KeyPoints,
    Script,
    Audio,
}

impl Stage {
    /// All stages in the order they run.
    pub const ALL: [Stage; 4] = [Stage::Summarize, Stage::KeyPoints, Stage::Script, Stage::Audio];

    /// Step label recorded when this stage succeeds.
    pub fn completed_step(self) -> Step {
        match self {
            Stage::Summarize => Step::SummarizeComplete,
            Stage::KeyPoints => Step::KeyPointsComplete,
            Stage::Script => Step::ScriptComplete,
            Stage::Audio => Step::AudioComplete,
        }
    }

    /// 1-based position in the pipeline.
    pub fn number(self) -> usize {
        match self {
            Stage::Summarize => 1,
            Stage::KeyPoints => 2,
            Stage::Script => 3,
            Stage::Audio => 4,
        }
    }

    /// Human-readable description used in logs and progress output.
    pub fn description(self) -> &'static str {
        match self {
            Stage::Summarize => "Summarizing content",
            Stage::KeyPoints => "Extracting key points",
            Stage::Script => "Generating podcast script",
            Stage::Audio => "Generating audio",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Summarize => "summarize",
            Stage::KeyPoints => "key_points",
            Stage::Script => "script",
            Stage::Audio => "audio",
        })
    }
}

/// Advisory progress marker. Never consulted to decide whether a stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Initialized,
    SummarizeComplete,
    KeyPointsComplete,
    ScriptComplete,
    AudioComplete,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Initialized => "initialized",
            Step::SummarizeComplete => "summarize_complete",
            Step::KeyPointsComplete => "key_points_complete",
            Step::ScriptComplete => "script_complete",
            Step::AudioComplete => "audio_complete",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one pipeline run produced.
///
/// Every field is always present; stages that failed or never ran leave
/// their field at its initial empty value. Check [`PipelineState::error`]
/// after the run to detect failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineState {
    /// Raw document text. Set once, never modified.
    pub source_text: String,
    /// Prose summary written by the summarize stage.
    pub summary: String,
    /// Key points in model output order.
    pub key_points: Vec<String>,
    /// Podcast script written by the script stage.
    pub script: String,
    /// One encoded audio blob per script chunk, in chunk order.
    #[serde(rename = "audio_segment_bytes", serialize_with = "segment_lengths")]
    pub audio_segments: Vec<Vec<u8>>,
    /// The playable result: the single segment, or all segments concatenated.
    #[serde(rename = "final_audio_bytes", serialize_with = "optional_length")]
    pub final_audio: Option<Vec<u8>>,
    /// The most recent stage failure. Later failures overwrite earlier ones.
    pub error: Option<StageError>,
    /// Last stage that completed successfully.
    pub current_step: Step,
}

impl PipelineState {
    /// Fresh state for a run over `source_text`.
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(self, summary: String) -> Self {
        Self {
            summary,
            current_step: Stage::Summarize.completed_step(),
            ..self
        }
    }

    pub fn with_key_points(self, key_points: Vec<String>) -> Self {
        Self {
            key_points,
            current_step: Stage::KeyPoints.completed_step(),
            ..self
        }
    }

    pub fn with_script(self, script: String) -> Self {
        Self {
            script,
            current_step: Stage::Script.completed_step(),
            ..self
        }
    }

    pub fn with_audio(self, audio_segments: Vec<Vec<u8>>, final_audio: Vec<u8>) -> Self {
        Self {
            audio_segments,
            final_audio: Some(final_audio),
            current_step: Stage::Audio.completed_step(),
            ..self
        }
    }

    /// Record a stage failure, replacing any earlier one.
    pub fn with_error(self, error: StageError) -> Self {
        Self {
            error: Some(error),
            ..self
        }
    }

    /// `true` when some stage failed during the run.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The stage-prefixed error message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

fn segment_lengths<S: Serializer>(segments: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(segments.iter().map(Vec::len))
}

fn optional_length<S: Serializer>(audio: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match audio {
        Some(bytes) => s.serialize_some(&bytes.len()),
        None => s.serialize_none(),
    }
}
