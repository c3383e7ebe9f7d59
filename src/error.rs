//! Error types for the edgequake-pdf2podcast library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`PodcastError`]: **Fatal**: nothing can be generated at all (bad
//!   input file, unreadable PDF, provider not configured). Returned as
//!   `Err(PodcastError)` from the top-level entry points.
//!
//! * [`StageError`]: **Non-fatal**: one pipeline stage failed. Stored in
//!   [`crate::state::PipelineState::error`] so the caller inspects the run
//!   afterwards instead of losing every other stage's output.
//!
//! * [`ServiceError`]: a single upstream call (chat completion or speech
//!   synthesis) failed. Stages convert it into a [`StageError`].

use crate::state::Stage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2podcast library.
///
/// Stage-level failures use [`StageError`] and are stored in
/// [`crate::state::PipelineState`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PodcastError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium opened the document but text extraction failed.
    #[error("Error extracting PDF text: {detail}")]
    TextExtraction { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium on the library search path, or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    /// The document yielded too little text to make a podcast from.
    #[error("Could not extract enough text from the PDF: {chars} characters (minimum {min})")]
    InsufficientText { chars: usize, min: usize },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The configured LLM provider is not initialised.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// No credential is available for the speech-synthesis service.
    #[error("No API key for the speech service.\nSet OPENAI_API_KEY or pass --api-key.")]
    MissingApiKey,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of one pipeline stage.
///
/// The display form carries the stage name as a prefix, e.g.
/// `"Summarization error: 401 Unauthorized"`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "stage", content = "detail", rename_all = "snake_case")]
pub enum StageError {
    #[error("Summarization error: {0}")]
    Summarize(String),

    #[error("Key points extraction error: {0}")]
    KeyPoints(String),

    #[error("Script generation error: {0}")]
    Script(String),

    #[error("Audio generation error: {0}")]
    Audio(String),
}

impl StageError {
    /// Wrap `detail` in the variant belonging to `stage`.
    pub fn new(stage: Stage, detail: impl std::fmt::Display) -> Self {
        let detail = detail.to_string();
        match stage {
            Stage::Summarize => StageError::Summarize(detail),
            Stage::KeyPoints => StageError::KeyPoints(detail),
            Stage::Script => StageError::Script(detail),
            Stage::Audio => StageError::Audio(detail),
        }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Summarize(_) => Stage::Summarize,
            StageError::KeyPoints(_) => Stage::KeyPoints,
            StageError::Script(_) => Stage::Script,
            StageError::Audio(_) => Stage::Audio,
        }
    }

    /// The underlying message without the stage prefix.
    pub fn detail(&self) -> &str {
        match self {
            StageError::Summarize(d)
            | StageError::KeyPoints(d)
            | StageError::Script(d)
            | StageError::Audio(d) => d,
        }
    }
}

/// Failure of a single call to a language-model or speech service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The LLM provider returned an error.
    #[error("{0}")]
    Provider(String),

    /// The HTTP request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service answered successfully but with nothing in it.
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
}
