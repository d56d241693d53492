//! Shared embed builders for bookmark and reminder messages
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use chrono::Utc;
use serenity::builder::CreateEmbed;
use serenity::model::Timestamp;

use crate::core::response::truncate_for_field;
use crate::features::reminders::ReminderPayload;

/// Default accent for bookmark embeds (Discord blurple)
pub const DEFAULT_BOOKMARK_COLOR: u32 = 0x5865F2;
/// Accent for reminder embeds
pub const REMINDER_COLOR: u32 = 0xFEE75C;

/// Build a Discord jump link; DMs use `@me` in place of the guild id.
pub fn jump_link(guild_id: Option<u64>, channel_id: u64, message_id: u64) -> String {
    match guild_id {
        Some(guild_id) => format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}"),
        None => format!("https://discord.com/channels/@me/{channel_id}/{message_id}"),
    }
}

/// Build the embed posted when a reminder fires.
pub fn reminder_embed(payload: &ReminderPayload) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("⏰ Reminder");
    embed.description(format!("Take another look at #{}.", payload.channel_name));
    embed.color(REMINDER_COLOR);
    if let Ok(now) = Timestamp::from_unix_timestamp(Utc::now().timestamp()) {
        embed.timestamp(now);
    }

    if !payload.content_snippet.is_empty() {
        embed.field("📝 Note", truncate_for_field(&payload.content_snippet), false);
    }
    if !payload.jump_url.is_empty() {
        embed.field(
            "🔗 Source Message",
            format!("[Open message]({})", payload.jump_url),
            false,
        );
    }
    if !payload.bookmark_url.is_empty() {
        embed.field(
            "📬 Saved Bookmark",
            format!("[Open bookmark]({})", payload.bookmark_url),
            false,
        );
    }

    embed
}
