//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 3.0.0: Bookmark and help handlers
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod bookmark;
pub mod help;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(bookmark::BookmarkHandler),
        Arc::new(help::HelpHandler),
    ]
}

/// Reply to a slash command with a message only the invoking user sees
pub async fn respond_ephemeral(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
) -> Result<()> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}
