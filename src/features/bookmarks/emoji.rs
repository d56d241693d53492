//! Emoji key normalization
//!
//! Preferences are keyed by the same string a reaction event resolves to:
//! unicode emoji as-is, custom emoji as `name:id`.

use regex::Regex;
use serenity::model::channel::ReactionType;
use std::sync::OnceLock;

fn custom_emoji_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^<(a)?:([A-Za-z0-9_~]+):(\d+)>$").ok())
        .as_ref()
}

/// Normalize user input for a single emoji into its storage key.
///
/// Returns `None` for blank input.
pub fn normalize_emoji(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = custom_emoji_pattern().and_then(|re| re.captures(trimmed)) {
        return Some(format!("{}:{}", &caps[2], &caps[3]));
    }

    Some(trimmed.to_string())
}

/// Split a raw option value into emoji tokens on commas and whitespace.
pub fn split_emoji_input(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Storage key for a reaction, matching [`normalize_emoji`].
pub fn reaction_key(reaction: &ReactionType) -> Option<String> {
    match reaction {
        ReactionType::Unicode(name) => normalize_emoji(name),
        ReactionType::Custom { id, name, .. } => {
            Some(format!("{}:{}", name.as_deref().unwrap_or_default(), id.0))
        }
        _ => None,
    }
}

/// Render a storage key back into something Discord displays as an emoji.
pub fn display_emoji(key: &str) -> String {
    match key.split_once(':') {
        Some((name, id)) if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) => {
            format!("<:{name}:{id}>")
        }
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::EmojiId;

    #[test]
    fn test_normalize_unicode() {
        assert_eq!(normalize_emoji(" ⏰ "), Some("⏰".to_string()));
        assert_eq!(normalize_emoji("   "), None);
    }

    #[test]
    fn test_normalize_custom_and_animated() {
        assert_eq!(
            normalize_emoji("<:party:123456>"),
            Some("party:123456".to_string())
        );
        assert_eq!(
            normalize_emoji("<a:dance:987>"),
            Some("dance:987".to_string())
        );
    }

    #[test]
    fn test_split_emoji_input() {
        assert_eq!(split_emoji_input("⏰, 📌\n🔖"), vec!["⏰", "📌", "🔖"]);
        assert!(split_emoji_input(" , ").is_empty());
    }

    #[test]
    fn test_reaction_key_matches_normalized_input() {
        let custom = ReactionType::Custom {
            animated: true,
            id: EmojiId(987),
            name: Some("dance".to_string()),
        };
        assert_eq!(reaction_key(&custom), normalize_emoji("<a:dance:987>"));

        let unicode = ReactionType::Unicode("📌".to_string());
        assert_eq!(reaction_key(&unicode), Some("📌".to_string()));
    }

    #[test]
    fn test_display_emoji() {
        assert_eq!(display_emoji("party:123"), "<:party:123>");
        assert_eq!(display_emoji("⏰"), "⏰");
    }
}
