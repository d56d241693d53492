//! Bookmark preference command handlers
//!
//! Handles: set-bookmark, remove-bookmark, list-bookmarks
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: destination and channel options
//! - 1.1.0: reminder and keep-reminder-on-complete options
//! - 1.0.0: Initial implementation

use anyhow::{anyhow, bail, Context as _, Result};
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::fmt::Write as _;
use std::sync::Arc;

use super::respond_ephemeral;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{
    get_bool_option, get_channel_option, get_string_option, LIST_BOOKMARKS_COMMAND,
    REMOVE_BOOKMARK_COMMAND, SET_BOOKMARK_COMMAND,
};
use crate::features::bookmarks::{
    display_emoji, normalize_emoji, split_emoji_input, BookmarkMode, Destination,
    EmojiPreference, UserPreferences,
};
use crate::features::reminders::{self, ReminderInput, ReminderSpec};

/// Handler for the bookmark preference commands
pub struct BookmarkHandler;

#[async_trait]
impl SlashCommandHandler for BookmarkHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            SET_BOOKMARK_COMMAND,
            REMOVE_BOOKMARK_COMMAND,
            LIST_BOOKMARKS_COMMAND,
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let reply = match command.data.name.as_str() {
            SET_BOOKMARK_COMMAND => self.handle_set(&ctx, command)?,
            REMOVE_BOOKMARK_COMMAND => self.handle_remove(&ctx, command)?,
            LIST_BOOKMARKS_COMMAND => self.handle_list(&ctx, command),
            _ => return Ok(()),
        };
        respond_ephemeral(serenity_ctx, command, reply).await
    }
}

impl BookmarkHandler {
    /// Handle /set-bookmark - create or update one emoji preference
    fn handle_set(&self, ctx: &CommandContext, command: &ApplicationCommandInteraction) -> Result<String> {
        let options = &command.data.options;
        let user_id = command.user.id.to_string();

        let raw_emoji = get_string_option(options, "emoji")
            .ok_or_else(|| anyhow!("emoji option is required"))?;
        let (token, key) = single_emoji(&raw_emoji, "configure")?;

        let mode: BookmarkMode = get_string_option(options, "mode")
            .ok_or_else(|| anyhow!("mode option is required"))?
            .parse()
            .map_err(|e: String| anyhow!(e))?;

        let request = PreferenceRequest {
            mode,
            color: get_string_option(options, "color"),
            destination: get_string_option(options, "destination"),
            channel: get_channel_option(options, "channel"),
            reminder: get_string_option(options, "reminder"),
            keep_reminder_on_complete: get_bool_option(options, "keep-reminder-on-complete"),
        };

        let existing = ctx.store.get_emoji(&user_id, &key);
        let resolved = resolve_preference(&request, existing.as_ref())?;

        ctx.store
            .set_emoji(&user_id, &key, resolved.pref.clone())
            .context("failed to save emoji preference")?;

        info!(
            "User {user_id} set bookmark {key} ({}, reminder: {})",
            resolved.pref.mode,
            reminders::describe(resolved.pref.reminder.as_ref())
        );

        Ok(summarize(&token, &resolved))
    }

    /// Handle /remove-bookmark - delete one emoji preference
    fn handle_remove(&self, ctx: &CommandContext, command: &ApplicationCommandInteraction) -> Result<String> {
        let user_id = command.user.id.to_string();
        let raw_emoji = get_string_option(&command.data.options, "emoji")
            .ok_or_else(|| anyhow!("emoji option is required"))?;
        let (token, key) = single_emoji(&raw_emoji, "remove")?;

        let removed = ctx
            .store
            .delete_emoji(&user_id, &key)
            .context("failed to remove emoji preference")?;

        if removed {
            info!("User {user_id} removed bookmark {key}");
            Ok(format!("🧹 Removed {token} from your shortcuts."))
        } else {
            Ok("⚠️ That emoji isn't saved yet. Use `/set-bookmark` to add it first.".to_string())
        }
    }

    /// Handle /list-bookmarks - show every configured emoji
    fn handle_list(&self, ctx: &CommandContext, command: &ApplicationCommandInteraction) -> String {
        let user_id = command.user.id.to_string();
        match ctx.store.get(&user_id) {
            Some(prefs) if !prefs.emojis.is_empty() => format_listing(&prefs),
            _ => "📭 No bookmark emojis saved yet. Use `/set-bookmark` to create one!".to_string(),
        }
    }
}

/// Split the option value and require exactly one emoji; returns (as typed, storage key).
fn single_emoji(raw: &str, verb: &str) -> Result<(String, String)> {
    let mut tokens = split_emoji_input(raw);
    match tokens.len() {
        0 => bail!("please provide an emoji"),
        1 => {}
        _ => bail!("please {verb} one emoji at a time"),
    }
    let token = tokens.remove(0);
    let key = normalize_emoji(&token).ok_or_else(|| anyhow!("unable to understand the provided emoji"))?;
    Ok((token, key))
}

/// Raw /set-bookmark options after the emoji and mode were read
#[derive(Debug, Default)]
pub struct PreferenceRequest {
    pub mode: BookmarkMode,
    pub color: Option<String>,
    pub destination: Option<String>,
    pub channel: Option<u64>,
    pub reminder: Option<String>,
    pub keep_reminder_on_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPreference {
    pub pref: EmojiPreference,
    /// Whether the reminder option was given (and not blank)
    pub reminder_changed: bool,
}

/// Merge a /set-bookmark request with the existing preference for the same emoji.
pub fn resolve_preference(
    request: &PreferenceRequest,
    existing: Option<&EmojiPreference>,
) -> Result<ResolvedPreference> {
    let color = resolve_color(request.color.as_deref(), existing)?;
    let destination = resolve_destination(
        request.destination.as_deref(),
        request.channel,
        existing.map(|e| &e.destination),
    )?;
    let (reminder, reminder_changed) = resolve_reminder(
        request.reminder.as_deref(),
        request.keep_reminder_on_complete,
        existing.and_then(|e| e.reminder.as_ref()),
    )?;

    Ok(ResolvedPreference {
        pref: EmojiPreference {
            mode: request.mode,
            color,
            destination,
            reminder,
        }
        .normalized(),
        reminder_changed,
    })
}

/// Parse `#rrggbb`, `0xrrggbb` or `rrggbb`; blank means no color.
pub fn parse_color(raw: &str) -> Result<Option<u32>> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        return Ok(None);
    }
    let hex = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix('#'))
        .unwrap_or(&cleaned);

    if hex.len() != 6 {
        bail!("color must be a 6 digit hex code");
    }
    let value = u32::from_str_radix(hex, 16).with_context(|| format!("invalid color value '{raw}'"))?;
    Ok(Some(value))
}

/// A blank or missing color keeps the existing one.
pub fn resolve_color(raw: Option<&str>, existing: Option<&EmojiPreference>) -> Result<Option<u32>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_color(raw),
        None => Ok(existing.and_then(|e| e.color)),
    }
}

fn resolve_destination(
    raw: Option<&str>,
    channel: Option<u64>,
    existing: Option<&Destination>,
) -> Result<Destination> {
    let requested = raw.map(|s| s.trim().to_lowercase());
    match requested.as_deref() {
        Some("dm") => Ok(Destination::Dm),
        Some("channel") => match channel {
            Some(id) => Ok(Destination::Channel(id.to_string())),
            None => bail!("choose a channel when the destination is channel"),
        },
        Some(other) if !other.is_empty() => {
            bail!("invalid destination '{other}'. choose dm or channel")
        }
        _ => Ok(match channel {
            Some(id) => Destination::Channel(id.to_string()),
            None => existing.cloned().unwrap_or_default(),
        }),
    }
}

/// Apply the reminder and keep-reminder options on top of the existing reminder.
///
/// Returns the new reminder and whether the reminder option was given.
fn resolve_reminder(
    raw: Option<&str>,
    keep_on_complete: Option<bool>,
    existing: Option<&ReminderSpec>,
) -> Result<(Option<ReminderSpec>, bool)> {
    let input = match raw {
        Some(raw) => reminders::parse(raw)?,
        None => ReminderInput::Unchanged,
    };

    match input {
        ReminderInput::Clear => {
            if keep_on_complete.is_some() {
                bail!("keep-reminder-on-complete cannot be used while clearing the reminder");
            }
            Ok((None, true))
        }
        ReminderInput::Set(kind) => {
            let remove_on_complete = keep_on_complete
                .map(|keep| !keep)
                .or(existing.map(|r| r.remove_on_complete))
                .unwrap_or(true);
            Ok((
                Some(ReminderSpec {
                    kind,
                    remove_on_complete,
                }),
                true,
            ))
        }
        ReminderInput::Unchanged => match (existing.copied(), keep_on_complete) {
            (Some(mut spec), Some(keep)) => {
                spec.remove_on_complete = !keep;
                Ok((Some(spec), false))
            }
            (None, Some(_)) => bail!(
                "no reminder is configured, so keep-reminder-on-complete cannot be changed. Set the reminder option too"
            ),
            (spec, None) => Ok((spec, false)),
        },
    }
}

fn done_behaviour(spec: &ReminderSpec) -> &'static str {
    if spec.remove_on_complete {
        "✅ clears on Done"
    } else {
        "🔁 stays after Done"
    }
}

fn describe_destination(destination: &Destination) -> String {
    match destination {
        Destination::Dm => "DMs".to_string(),
        Destination::Channel(id) => format!("<#{id}>"),
    }
}

fn summarize(token: &str, resolved: &ResolvedPreference) -> String {
    let pref = &resolved.pref;
    let mut reply = format!(
        "Saved {token} in {} mode. React with it to save messages to {}!",
        pref.mode,
        describe_destination(&pref.destination)
    );
    if let Some(color) = pref.color {
        let _ = write!(reply, " Embed color set to #{color:06X}.");
    }
    match &pref.reminder {
        Some(spec) => {
            let _ = write!(
                reply,
                " Reminder: {} ({}).",
                reminders::describe(Some(spec)),
                done_behaviour(spec)
            );
        }
        None if resolved.reminder_changed => reply.push_str(" Reminder cleared."),
        None => {}
    }
    reply
}

/// Sorted listing of a user's emoji preferences
pub fn format_listing(prefs: &UserPreferences) -> String {
    let mut out = String::from("⭐ Saved bookmark shortcuts:\n");
    for (emoji, pref) in &prefs.emojis {
        let color = pref
            .color
            .map(|c| format!("#{c:06X}"))
            .unwrap_or_else(|| "default".to_string());
        let _ = writeln!(
            out,
            "• {} · {} mode (color: {color})",
            display_emoji(emoji),
            pref.mode
        );
        let _ = writeln!(
            out,
            "  ↳ 📬 Destination: {}",
            describe_destination(&pref.destination)
        );
        let _ = write!(
            out,
            "  ↳ ⏰ Reminder: {}",
            reminders::describe(pref.reminder.as_ref())
        );
        if let Some(spec) = &pref.reminder {
            let _ = write!(out, " / {}", done_behaviour(spec));
        }
        out.push('\n');
    }
    out.push_str("\nUse `/set-bookmark` to tweak settings or `/remove-bookmark` to delete one.");
    out
}
