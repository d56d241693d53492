//! Outbound reminder delivery
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use crate::core::embeds::reminder_embed;

/// Everything needed to render a reminder once its timer fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderPayload {
    /// Channel the reminder is posted to (the bookmark's destination)
    pub channel_id: String,
    /// Link back to the original message
    pub jump_url: String,
    /// Link to the bookmark copy
    pub bookmark_url: String,
    pub channel_name: String,
    pub content_snippet: String,
}

/// Sends a due reminder to the platform.
///
/// Failures are reported to the scheduler, which logs them; nothing is retried.
#[async_trait]
pub trait ReminderSender: Send + Sync {
    async fn send_reminder(&self, payload: &ReminderPayload) -> Result<()>;
}

/// Posts reminder embeds through the Discord HTTP API
pub struct DiscordReminderSender {
    http: Arc<Http>,
}

impl DiscordReminderSender {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReminderSender for DiscordReminderSender {
    async fn send_reminder(&self, payload: &ReminderPayload) -> Result<()> {
        let channel_id: u64 = payload
            .channel_id
            .parse()
            .with_context(|| format!("invalid reminder channel id '{}'", payload.channel_id))?;

        let embed = reminder_embed(payload);
        ChannelId(channel_id)
            .send_message(&self.http, |m| m.set_embed(embed))
            .await
            .context("failed to deliver reminder")?;

        info!("⏰ Delivered reminder to channel {channel_id}");
        Ok(())
    }
}
