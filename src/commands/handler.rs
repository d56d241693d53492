//! Slash command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// Processes one or more slash commands.
///
/// Handlers are registered with a [`CommandRegistry`](super::CommandRegistry)
/// and dispatched by command name. An `Err` is reported back to the invoking
/// user as an ephemeral error message.
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay usable as `dyn SlashCommandHandler`
    fn _assert_object_safe(_: &dyn SlashCommandHandler) {}
}
