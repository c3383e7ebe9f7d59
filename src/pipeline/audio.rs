//! Stage 4: turn the script into audio.
//!
//! ## Chunking
//!
//! Speech endpoints cap the input length (4096 characters for OpenAI).
//! Scripts up to `max_chars` go out whole. Longer scripts are cut at every
//! `". "` and the sentences are packed greedily: a sentence joins the open
//! chunk while `chunk_len + sentence_len < max_chars`, otherwise the chunk
//! is closed and the sentence starts the next one. A sentence that alone
//! exceeds the limit is never split; it becomes an oversized chunk and the
//! service decides whether to accept it.
//!
//! ## Joining
//!
//! Segments are joined by plain byte concatenation. MP3 is a sequence of
//! self-delimiting frames, so players accept back-to-back streams. Switching
//! to a container format (WAV, M4A, Ogg) would need real muxing here.

use crate::error::StageError;
use crate::progress::ProgressCallback;
use crate::speech::SpeechSynthesizer;
use crate::state::Stage;
use tracing::{debug, info};

const SENTENCE_BREAK: &str = ". ";

/// Output of a successful audio stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// One encoded segment per script chunk, in chunk order.
    pub segments: Vec<Vec<u8>>,
    /// All segments joined; see [`combine_segments`].
    pub combined: Vec<u8>,
}

/// Synthesise `script` chunk by chunk, strictly in order.
///
/// The first failing chunk aborts the stage and every segment produced so
/// far is discarded; a failed stage never yields partial audio.
pub async fn synthesize_script(
    speech: &dyn SpeechSynthesizer,
    script: &str,
    max_chars: usize,
    progress: Option<&ProgressCallback>,
) -> Result<SynthesizedAudio, StageError> {
    let chunks = split_script(script, max_chars);
    let total = chunks.len();
    debug!(
        "Script of {} chars split into {} chunk(s)",
        script.chars().count(),
        total
    );

    let mut segments = Vec::with_capacity(total);
    for (i, chunk) in chunks.iter().enumerate() {
        info!("Generating audio segment {}/{}...", i + 1, total);
        let audio = speech
            .synthesize(chunk)
            .await
            .map_err(|e| StageError::new(Stage::Audio, e))?;

        if let Some(cb) = progress {
            cb.on_segment_complete(i + 1, total, audio.len());
        }
        segments.push(audio);
    }

    let combined = combine_segments(&segments);
    Ok(SynthesizedAudio { segments, combined })
}

/// Split a script into speech-sized chunks (see the module docs).
///
/// Lengths are counted in characters. A script of exactly `max_chars`
/// characters is one chunk. Chunks are trimmed, and empty chunks are never
/// produced for a non-empty script.
pub fn split_script(script: &str, max_chars: usize) -> Vec<String> {
    if script.chars().count() <= max_chars {
        return vec![script.to_string()];
    }

    let sentences: Vec<&str> = script.split(SENTENCE_BREAK).collect();
    let last = sentences.len() - 1;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for (i, sentence) in sentences.iter().enumerate() {
        let sentence_len = sentence.chars().count();

        if current_len + sentence_len >= max_chars && !current.is_empty() {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current_len = 0;
        }

        current.push_str(sentence);
        current_len += sentence_len;
        if i < last {
            current.push_str(SENTENCE_BREAK);
            current_len += SENTENCE_BREAK.len();
        }
    }
    push_trimmed(&mut chunks, &current);

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

/// Join encoded segments in order.
///
/// A single segment comes back byte-for-byte unchanged.
pub fn combine_segments(segments: &[Vec<u8>]) -> Vec<u8> {
    match segments {
        [only] => only.clone(),
        _ => segments.concat(),
    }
}
