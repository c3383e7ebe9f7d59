//! Stage 2: extract key points from the summary.

use crate::error::StageError;
use crate::llm::LanguageModel;
use crate::prompts::key_points_prompt;
use crate::state::Stage;

/// Ask the model for key points and parse its reply with [`parse_key_points`].
pub async fn extract_key_points(
    model: &dyn LanguageModel,
    summary: &str,
) -> Result<Vec<String>, StageError> {
    let response = model
        .complete(&key_points_prompt(summary))
        .await
        .map_err(|e| StageError::new(Stage::KeyPoints, e))?;

    Ok(parse_key_points(&response))
}

/// One key point per non-blank line, trimmed, in response order.
///
/// List markers such as `1.` or `-` are kept as the model wrote them.
pub fn parse_key_points(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_list() {
        let response = "1. First point\n2. Second point\n3. Third point";
        assert_eq!(
            parse_key_points(response),
            vec!["1. First point", "2. Second point", "3. Third point"]
        );
    }

    #[test]
    fn drops_blank_lines_and_trims() {
        let response = "\n\n   Alpha  \r\n\t\n  Beta\n   \nGamma\t\n\n";
        assert_eq!(parse_key_points(response), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let response = "b\na\nb";
        assert_eq!(parse_key_points(response), vec!["b", "a", "b"]);
    }

    #[test]
    fn empty_response_gives_no_points() {
        assert!(parse_key_points("").is_empty());
        assert!(parse_key_points("  \n \n").is_empty());
    }
}
