//! Prompt templates for the three language-model stages.
//!
//! All prompt text lives here so tuning the tone or structure of the
//! podcast never touches the stage or orchestration code, and so tests can
//! inspect the rendered prompts without a live model.
//!
//! Each template carries `{placeholder}` markers that the `*_prompt`
//! builders substitute.

/// Template for the summarize stage. Placeholder: `{text}`.
pub const SUMMARIZE_TEMPLATE: &str = r#"You are an expert at summarizing content for podcast creation.

Analyze the following text and provide a comprehensive summary that captures:
- Main themes and topics
- Key arguments or points
- Important details and examples

Text:
{text}

Summary:"#;

/// Template for the key-point stage. Placeholder: `{text}`.
pub const KEY_POINTS_TEMPLATE: &str = r#"Extract the 5-7 most important key points from this text that would be interesting
for a podcast audience. Make them engaging and conversational.

Text:
{text}

Key Points (numbered list):"#;

/// Template for the script stage. Placeholders: `{summary}`, `{key_points}`.
pub const PODCAST_SCRIPT_TEMPLATE: &str = r#"You are a professional podcast scriptwriter. Create an engaging, conversational
podcast script based on the summary and key points below.

Guidelines:
- Write in a warm, conversational tone
- Use storytelling techniques
- Include smooth transitions between topics
- Add rhetorical questions to engage listeners
- Make it sound natural when spoken aloud
- Length: approximately 3-5 minutes when read
- Start with a hook and end with a memorable conclusion

Summary:
{summary}

Key Points:
{key_points}

Podcast Script:"#;

/// Render the summarize prompt for an already-truncated document.
pub fn summarize_prompt(text: &str) -> String {
    SUMMARIZE_TEMPLATE.replace("{text}", text)
}

/// Render the key-point prompt for a summary.
pub fn key_points_prompt(summary: &str) -> String {
    KEY_POINTS_TEMPLATE.replace("{text}", summary)
}

/// Render the script prompt. Key points are joined one per line.
pub fn podcast_script_prompt(summary: &str, key_points: &[String]) -> String {
    // Substitute key points first so a literal "{key_points}" inside the
    // summary is left alone.
    PODCAST_SCRIPT_TEMPLATE
        .replace("{key_points}", &key_points.join("\n"))
        .replacen("{summary}", summary, 1)
}
