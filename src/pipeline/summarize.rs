//! Stage 1: summarise the source document.

use crate::error::StageError;
use crate::llm::LanguageModel;
use crate::prompts::summarize_prompt;
use crate::state::Stage;
use crate::text::truncate_chars;
use tracing::debug;

/// Summarise the first `char_budget` characters of `source_text`.
///
/// Text past the budget is dropped without any marker. The model's reply is
/// returned verbatim, even when empty.
pub async fn summarize(
    model: &dyn LanguageModel,
    source_text: &str,
    char_budget: usize,
) -> Result<String, StageError> {
    let text = truncate_chars(source_text, char_budget);
    debug!(
        "Summarizing {} of {} chars of source text",
        text.chars().count(),
        source_text.chars().count()
    );

    model
        .complete(&summarize_prompt(text))
        .await
        .map_err(|e| StageError::new(Stage::Summarize, e))
}
