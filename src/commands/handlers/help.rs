//! Help command handler
//!
//! Handles: bookmark-help

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::respond_ephemeral;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::HELP_COMMAND;

const HELP_TEXT: &str = "**How to use the bookmark bot**\n\
• `/set-bookmark emoji:📌 mode:complete color:#FFD700` assigns a save mode and color to an emoji.\n\
• `reminder:30m` or `reminder:08:00` adds a reminder; `reminder:off` clears it.\n\
• `destination:channel channel:#reading-list` delivers bookmarks to a channel instead of your DMs.\n\
• `/list-bookmarks` shows your emojis and their settings.\n\
• `/remove-bookmark emoji:📌` deletes one.\n\n\
React to any message with a saved emoji to receive a copy in the mode you chose. \
Press **Done** or **Remove** on the copy when you're finished with it.";

/// Handler for /bookmark-help
pub struct HelpHandler;

#[async_trait]
impl SlashCommandHandler for HelpHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[HELP_COMMAND]
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        respond_ephemeral(serenity_ctx, command, HELP_TEXT).await
    }
}
