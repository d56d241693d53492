use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Reaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use bookmark_bot::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use bookmark_bot::core::Config;
use bookmark_bot::features::bookmarks::PreferenceStore;
use bookmark_bot::features::reminders::{DiscordReminderSender, ReminderScheduler};
use bookmark_bot::message_components::MessageComponentHandler;
use bookmark_bot::reactions::ReactionHandler;

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
    reaction_handler: Arc<ReactionHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        let registered = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registered {
            error!("Failed to register slash commands: {e}");
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        if let Err(e) = self
            .reaction_handler
            .handle_reaction_add(&ctx, &reaction)
            .await
        {
            error!(
                "Error bookmarking message {} in channel {}: {e:#}",
                reaction.message_id, reaction.channel_id
            );
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting bookmark bot...");

    let store = Arc::new(PreferenceStore::open(&config.store_path)?);

    let reminder_http = Arc::new(Http::new(&config.discord_token));
    let scheduler = ReminderScheduler::new(
        &config.reminder_store_path,
        Arc::new(DiscordReminderSender::new(reminder_http)),
    )?;
    info!(
        "⏰ Restored {} pending reminders from {}",
        scheduler.len(),
        scheduler.path().display()
    );

    let command_handler = CommandHandler::new(CommandContext::new(store, scheduler.clone()));
    let reaction_handler = ReactionHandler::new(Arc::clone(command_handler.context()));
    let component_handler = MessageComponentHandler::new(scheduler.clone());

    let handler = Handler {
        command_handler: Arc::new(command_handler),
        component_handler: Arc::new(component_handler),
        reaction_handler: Arc::new(reaction_handler),
        guild_id: config.discord_guild_id.map(GuildId),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .application_id(config.application_id)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("Shutting down: stopping reminder timers");
        scheduler.close();
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Connecting to Discord gateway...");
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
