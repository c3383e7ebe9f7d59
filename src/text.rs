//! Character-budget helpers for text sent to language models.
//!
//! Budgets are counted in Unicode scalar values (`char`s), not bytes.

/// Default character budget for [`chunk_words`].
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Return at most the first `max_chars` characters of `text`.
///
/// A hard cut: no sentence awareness, no ellipsis appended.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Split `text` into chunks of whitespace-separated words.
///
/// Words are accumulated greedily; each word costs its length plus one for
/// the joining space. A word that would push the running cost past
/// `chunk_size` starts a new chunk, unless the current chunk is empty, so a
/// single word longer than the budget still forms its own chunk. Chunks are
/// the words re-joined with single spaces.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count() + 1;

        if current_len + word_len > chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
