//! Pipeline stages for PDF-to-podcast generation.
//!
//! Each submodule implements exactly one transformation step and returns a
//! typed `Result`; none of them touches [`crate::state::PipelineState`].
//! The orchestrator in [`crate::generate`] decides what a failure means for
//! the rest of the run.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ summarize ──▶ key_points ──▶ script ──▶ audio
//! (pdfium)     (LLM)          (LLM)         (LLM)      (TTS)
//! ```
//!
//! 1. [`extract`]:    pull page text out of the PDF; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`summarize`]:  truncate the document and ask for a prose summary
//! 3. [`key_points`]: ask for 5–7 key points and parse them one per line
//! 4. [`script`]:     turn summary + key points into a spoken script
//! 5. [`audio`]:      split the script at sentence ends, synthesise each
//!    chunk, and join the MP3 segments

pub mod audio;
pub mod extract;
pub mod key_points;
pub mod script;
pub mod summarize;
