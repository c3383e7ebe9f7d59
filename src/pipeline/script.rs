//! Stage 3: write the podcast script.

use crate::error::StageError;
use crate::llm::LanguageModel;
use crate::prompts::podcast_script_prompt;
use crate::state::Stage;

/// Generate a conversational script from the summary and key points.
pub async fn generate_script(
    model: &dyn LanguageModel,
    summary: &str,
    key_points: &[String],
) -> Result<String, StageError> {
    model
        .complete(&podcast_script_prompt(summary, key_points))
        .await
        .map_err(|e| StageError::new(Stage::Script, e))
}
