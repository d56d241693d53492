//! Bookmark message rendering for the three save modes
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Owner id in button custom ids
//! - 1.1.0: Reminder field and Done button when a reminder is scheduled
//! - 1.0.0: Lightweight, balanced and complete layouts

use chrono::{DateTime, Local, TimeZone};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::channel::{Message, ReactionType};

use super::preference::BookmarkMode;
use crate::core::response::{truncate_chars, truncate_for_embed, truncate_for_field};
use crate::features::reminders::Schedule;

/// Custom id of the "Done" button
pub const COMPLETE_BUTTON_ID: &str = "bookmark_complete";
/// Custom id of the "Remove" button
pub const DELETE_BUTTON_ID: &str = "bookmark_delete";

/// Separates the button action from the owner's user id in a custom id
const OWNER_SEPARATOR: char = ':';

/// Custom id for a bookmark button, tagged with the owner when known
pub fn button_custom_id(action_id: &str, owner_id: Option<u64>) -> String {
    match owner_id {
        Some(owner) => format!("{action_id}{OWNER_SEPARATOR}{owner}"),
        None => action_id.to_string(),
    }
}

/// Split a button custom id into its action id and owner.
///
/// Untagged ids have no owner; a tag that is not a user id is kept as part of the action.
pub fn split_button_custom_id(custom_id: &str) -> (&str, Option<u64>) {
    match custom_id.split_once(OWNER_SEPARATOR) {
        Some((action, owner)) => match owner.parse() {
            Ok(owner) => (action, Some(owner)),
            Err(_) => (custom_id, None),
        },
        None => (custom_id, None),
    }
}

/// Content shown in a lightweight bookmark
const LIGHTWEIGHT_CONTENT_CHARS: usize = 500;
/// Attachments listed in a balanced bookmark before summarizing the rest
const BALANCED_ATTACHMENT_LIMIT: usize = 3;
/// Discord rejects messages with more embeds than this
const MAX_EMBEDS: usize = 10;

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Default)]
pub struct AttachmentInfo {
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
}

impl AttachmentInfo {
    pub fn is_image(&self) -> bool {
        if self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
        {
            return true;
        }
        let lower = self.filename.to_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }
}

/// The parts of a source message a bookmark copies
#[derive(Debug, Clone, Default)]
pub struct SourceMessage {
    pub author: String,
    pub content: String,
    pub posted: String,
    pub attachments: Vec<AttachmentInfo>,
    pub embeds: Vec<CreateEmbed>,
    /// Image or thumbnail url of each original embed, in order
    pub embed_images: Vec<String>,
}

impl SourceMessage {
    pub fn from_message(msg: &Message) -> Self {
        let posted = Local
            .timestamp_opt(msg.timestamp.unix_timestamp(), 0)
            .single()
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_default();

        Self {
            author: msg.author.tag(),
            content: msg.content.clone(),
            posted,
            attachments: msg
                .attachments
                .iter()
                .map(|a| AttachmentInfo {
                    filename: a.filename.clone(),
                    url: a.url.clone(),
                    content_type: a.content_type.clone(),
                })
                .collect(),
            embeds: msg.embeds.iter().cloned().map(CreateEmbed::from).collect(),
            embed_images: msg
                .embeds
                .iter()
                .filter_map(|e| {
                    e.image
                        .as_ref()
                        .map(|i| i.url.clone())
                        .or_else(|| e.thumbnail.as_ref().map(|t| t.url.clone()))
                })
                .filter(|url| !url.is_empty())
                .collect(),
        }
    }

    /// First image attachment, else the first original embed image.
    pub fn first_image(&self) -> Option<&str> {
        self.attachments
            .iter()
            .find(|a| a.is_image())
            .map(|a| a.url.as_str())
            .or_else(|| self.embed_images.first().map(String::as_str))
    }
}

/// Everything outside the source message that shapes a bookmark
pub struct RenderOptions<'a> {
    pub mode: BookmarkMode,
    pub channel_name: &'a str,
    pub jump_url: &'a str,
    pub color: u32,
    /// Reacted emoji name, used in the lightweight title
    pub emoji_name: Option<&'a str>,
    pub schedule: Option<&'a Schedule>,
    pub saved_at: DateTime<Local>,
    /// User allowed to press the bookmark's buttons
    pub owner_id: Option<u64>,
}

pub struct RenderedBookmark {
    pub embeds: Vec<CreateEmbed>,
    pub components: CreateComponents,
}

pub fn render(source: &SourceMessage, opts: &RenderOptions<'_>) -> RenderedBookmark {
    match opts.mode {
        BookmarkMode::Lightweight => render_lightweight(source, opts),
        BookmarkMode::Balanced => render_balanced(source, opts),
        BookmarkMode::Complete => render_complete(source, opts),
    }
}

fn render_lightweight(source: &SourceMessage, opts: &RenderOptions<'_>) -> RenderedBookmark {
    let title_emoji = opts.emoji_name.filter(|n| !n.is_empty()).unwrap_or("👀");

    let mut embed = CreateEmbed::default();
    embed.title(format!("{title_emoji} Quick Read"));
    embed.color(opts.color);
    embed.field("📺 Channel", format!("#{}", opts.channel_name), true);
    embed.field("💾 Saved", opts.saved_at.format(TIME_FORMAT), true);
    if let Some(schedule) = opts.schedule {
        embed.field("⏰ Reminder", &schedule.description, true);
    }
    if !source.content.is_empty() {
        embed.description(truncate_chars(&source.content, LIGHTWEIGHT_CONTENT_CHARS).trim());
    }
    if !opts.jump_url.is_empty() {
        embed.field("🔗 Source Message", format!("[Open]({})", opts.jump_url), false);
    }
    if let Some(url) = source.first_image() {
        embed.image(url);
    }

    RenderedBookmark {
        embeds: vec![embed],
        components: buttons(None, true, opts.owner_id),
    }
}

fn render_balanced(source: &SourceMessage, opts: &RenderOptions<'_>) -> RenderedBookmark {
    let mut embeds = vec![info_embed("🔖 Smart Save", source, opts, false)];
    if let [only] = source.embeds.as_slice() {
        embeds.push(only.clone());
    }

    RenderedBookmark {
        embeds,
        components: buttons(None, opts.schedule.is_some(), opts.owner_id),
    }
}

fn render_complete(source: &SourceMessage, opts: &RenderOptions<'_>) -> RenderedBookmark {
    let mut embeds = vec![info_embed("📌 Full Save", source, opts, true)];
    embeds.extend(source.embeds.iter().take(MAX_EMBEDS - 1).cloned());

    let link = Some(opts.jump_url).filter(|url| !url.is_empty());
    RenderedBookmark {
        embeds,
        components: buttons(link, opts.schedule.is_some(), opts.owner_id),
    }
}

fn info_embed(
    title: &str,
    source: &SourceMessage,
    opts: &RenderOptions<'_>,
    all_attachments: bool,
) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(title);
    embed.color(opts.color);
    embed.field("🙋 Author", &source.author, true);
    embed.field("📺 Channel", format!("#{}", opts.channel_name), true);
    embed.field("🕓 Posted", &source.posted, true);
    if let Some(schedule) = opts.schedule {
        embed.field("⏰ Reminder", &schedule.description, true);
    }
    if !source.content.is_empty() {
        embed.description(truncate_for_embed(&source.content));
    }
    if !opts.jump_url.is_empty() {
        embed.field("🔗 Source Message", format!("[Open]({})", opts.jump_url), false);
    }
    if let Some(value) = attachments_field(&source.attachments, all_attachments) {
        embed.field("🖇️ Attachments", value, false);
    }
    embed
}

/// Markdown list of attachment links; balanced mode lists three and counts the rest.
pub fn attachments_field(attachments: &[AttachmentInfo], include_all: bool) -> Option<String> {
    if attachments.is_empty() {
        return None;
    }

    let limit = if include_all {
        attachments.len()
    } else {
        attachments.len().min(BALANCED_ATTACHMENT_LIMIT)
    };

    let mut entries: Vec<String> = attachments
        .iter()
        .take(limit)
        .map(|a| {
            let name = if a.filename.is_empty() { &a.url } else { &a.filename };
            format!("[{name}]({})", a.url)
        })
        .collect();

    if attachments.len() > limit {
        entries.push(format!("… +{} more", attachments.len() - limit));
    }

    Some(truncate_for_field(&entries.join("\n")))
}

fn buttons(source_link: Option<&str>, with_done: bool, owner_id: Option<u64>) -> CreateComponents {
    let mut components = CreateComponents::default();
    components.create_action_row(|row| {
        if let Some(url) = source_link {
            row.create_button(|b| {
                b.style(ButtonStyle::Link)
                    .label("Source")
                    .emoji(ReactionType::Unicode("🔗".to_string()))
                    .url(url)
            });
        }
        if with_done {
            row.create_button(|b| {
                b.style(ButtonStyle::Success)
                    .label("Done")
                    .emoji(ReactionType::Unicode("✅".to_string()))
                    .custom_id(button_custom_id(COMPLETE_BUTTON_ID, owner_id))
            });
        }
        row.create_button(|b| {
            b.style(ButtonStyle::Danger)
                .label("Remove")
                .emoji(ReactionType::Unicode("🗑️".to_string()))
                .custom_id(button_custom_id(DELETE_BUTTON_ID, owner_id))
        })
    });
    components
}
