//! Reaction-triggered bookmark delivery
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Deliver to a configured channel
//! - 1.1.0: Schedule reminders for delivered bookmarks
//! - 1.0.0: DM a formatted copy on reaction

use anyhow::{Context as _, Result};
use chrono::Local;
use log::{debug, error, info, warn};
use serenity::model::channel::{Channel, Reaction, ReactionType};
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::CommandContext;
use crate::core::embeds::{jump_link, DEFAULT_BOOKMARK_COLOR};
use crate::core::response::snippet;
use crate::features::bookmarks::{
    reaction_key, render, Destination, RenderOptions, SourceMessage,
};
use crate::features::reminders::{self, ReminderPayload};

/// Characters of message content kept for the reminder note
const REMINDER_SNIPPET_CHARS: usize = 200;

pub struct ReactionHandler {
    context: Arc<CommandContext>,
}

impl ReactionHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    pub async fn handle_reaction_add(&self, ctx: &Context, reaction: &Reaction) -> Result<()> {
        let Some(user_id) = reaction.user_id else {
            return Ok(());
        };
        if user_id == ctx.cache.current_user_id() {
            return Ok(());
        }

        let Some(key) = reaction_key(&reaction.emoji) else {
            return Ok(());
        };
        let Some(pref) = self.context.store.get_emoji(&user_id.to_string(), &key) else {
            return Ok(());
        };

        info!(
            "Bookmarking message {} for user {user_id} with {key} ({} mode)",
            reaction.message_id, pref.mode
        );

        let message = ctx
            .http
            .get_message(reaction.channel_id.0, reaction.message_id.0)
            .await
            .context("failed to fetch message")?;
        let channel_name = fetch_channel_name(ctx, reaction.channel_id).await;

        let (target, target_guild) = match &pref.destination {
            Destination::Dm => {
                let dm = user_id
                    .create_dm_channel(&*ctx.http)
                    .await
                    .context("failed to create DM channel")?;
                (dm.id, None)
            }
            Destination::Channel(id) => {
                let channel = ChannelId(
                    id.parse()
                        .with_context(|| format!("invalid bookmark channel id '{id}'"))?,
                );
                (channel, guild_of(ctx, channel))
            }
        };

        let jump_url = jump_link(
            reaction.guild_id.map(|g| g.0),
            reaction.channel_id.0,
            reaction.message_id.0,
        );

        let schedule = pref.reminder.as_ref().and_then(|spec| {
            reminders::next(&spec.kind, &Local::now())
                .map_err(|e| warn!("Failed to compute reminder for {key}: {e}"))
                .ok()
        });

        let source = SourceMessage::from_message(&message);
        let rendered = render(
            &source,
            &RenderOptions {
                mode: pref.mode,
                channel_name: &channel_name,
                jump_url: &jump_url,
                color: pref.color.unwrap_or(DEFAULT_BOOKMARK_COLOR),
                emoji_name: title_emoji(&reaction.emoji),
                schedule: schedule.as_ref(),
                saved_at: Local::now(),
                owner_id: Some(user_id.0),
            },
        );

        let sent = target
            .send_message(&ctx.http, |m| {
                m.set_embeds(rendered.embeds)
                    .set_components(rendered.components)
            })
            .await
            .context("failed to send bookmark")?;
        debug!("Delivered bookmark {} to channel {target}", sent.id);

        if let (Some(spec), Some(schedule)) = (pref.reminder, schedule) {
            let payload = ReminderPayload {
                channel_id: target.to_string(),
                jump_url,
                bookmark_url: jump_link(target_guild.map(|g| g.0), target.0, sent.id.0),
                channel_name,
                content_snippet: snippet(&message.content, REMINDER_SNIPPET_CHARS),
            };
            if let Err(e) = self.context.scheduler.schedule(
                &sent.id.to_string(),
                schedule.at,
                payload,
                spec.remove_on_complete,
            ) {
                error!("Failed to schedule reminder for bookmark {}: {e}", sent.id);
            }
        }

        Ok(())
    }
}

/// Name shown in the lightweight title
fn title_emoji(emoji: &ReactionType) -> Option<&str> {
    match emoji {
        ReactionType::Unicode(name) => Some(name.as_str()),
        ReactionType::Custom { name, .. } => name.as_deref(),
        _ => None,
    }
}

fn guild_of(ctx: &Context, channel_id: ChannelId) -> Option<GuildId> {
    ctx.cache.guild_channel(channel_id).map(|c| c.guild_id)
}

/// Channel name from the cache, then the API, falling back to the id.
async fn fetch_channel_name(ctx: &Context, channel_id: ChannelId) -> String {
    if let Some(channel) = ctx.cache.guild_channel(channel_id) {
        return channel.name;
    }

    match ctx.http.get_channel(channel_id.0).await {
        Ok(Channel::Guild(channel)) if !channel.name.is_empty() => channel.name,
        Ok(_) => channel_id.to_string(),
        Err(e) => {
            warn!("Failed to fetch channel name for {channel_id}: {e}");
            channel_id.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::EmojiId;

    #[test]
    fn test_title_emoji() {
        assert_eq!(title_emoji(&ReactionType::Unicode("⏰".to_string())), Some("⏰"));
        let custom = ReactionType::Custom {
            animated: false,
            id: EmojiId(1),
            name: Some("party".to_string()),
        };
        assert_eq!(title_emoji(&custom), Some("party"));
    }
}
