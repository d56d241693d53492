//! Text limits and truncation helpers for Discord messages
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add character-count truncation and snippet helpers for bookmarks
//! - 1.0.0: Initial embed/message limit helpers

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord embed field value limit
pub const FIELD_LIMIT: usize = 1024;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Truncate text to fit embed limit, adding ellipsis if needed
pub fn truncate_for_embed(text: &str) -> String {
    truncate_bytes(text, EMBED_LIMIT)
}

/// Truncate text to fit an embed field value, adding ellipsis if needed
pub fn truncate_for_field(text: &str) -> String {
    truncate_bytes(text, FIELD_LIMIT)
}

/// Truncate text to fit message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    truncate_bytes(text, MESSAGE_LIMIT)
}

fn truncate_bytes(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }

    // Find a safe UTF-8 boundary
    let mut end = limit - 3; // Room for "..."
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Keep at most `max_chars` characters, without any ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Trimmed preview of `text` capped at `max_chars`, ending in `…` when cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > max_chars {
        format!("{}…", truncate_chars(trimmed, max_chars).trim())
    } else {
        trimmed.to_string()
    }
}
