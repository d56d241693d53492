use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::handlers::respond_ephemeral;
use crate::commands::{CommandContext, CommandRegistry};
use crate::core::truncate_for_message;

/// Dispatches slash commands to their registered handlers
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        Self {
            context: Arc::new(context),
            registry: CommandRegistry::with_all_handlers(),
        }
    }

    pub fn context(&self) -> &Arc<CommandContext> {
        &self.context
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{request_id}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {guild_id}",
            command.data.name, command.user.id, command.channel_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{request_id}] Unknown slash command: {}", command.data.name);
            return respond_ephemeral(ctx, command, "❌ Unknown command.").await;
        };

        match handler.handle(Arc::clone(&self.context), ctx, command).await {
            Ok(()) => {
                debug!("[{request_id}] ✅ /{} completed", command.data.name);
                Ok(())
            }
            Err(e) => {
                warn!("[{request_id}] /{} failed: {e:#}", command.data.name);
                let reply = truncate_for_message(&format!("❌ Error: {e}"));
                if let Err(send_err) = respond_ephemeral(ctx, command, reply).await {
                    error!("[{request_id}] ❌ Failed to send error reply to Discord: {send_err}");
                }
                Ok(())
            }
        }
    }
}
