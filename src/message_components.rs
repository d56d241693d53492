use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use crate::features::bookmarks::{split_button_custom_id, COMPLETE_BUTTON_ID, DELETE_BUTTON_ID};
use crate::features::reminders::ReminderScheduler;

/// Custom id of the close button used by simpler DM layouts
pub const CLOSE_DM_BUTTON_ID: &str = "close_dm";

const NOT_OWNER_REPLY: &str = "❌ Only the person who saved this bookmark can use its buttons.";

/// Buttons attached to a delivered bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// "Done": remove the copy; the reminder follows its removeOnComplete flag
    Complete,
    /// "Remove": remove the copy and always cancel its reminder
    Delete,
    Close,
}

/// A pressed button: what to do and who may do it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentPress {
    pub action: ComponentAction,
    /// Owner recorded in the custom id; untagged buttons accept anyone
    pub owner_id: Option<u64>,
}

impl ComponentPress {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        let (action_id, owner_id) = split_button_custom_id(custom_id);
        ComponentAction::from_custom_id(action_id).map(|action| Self { action, owner_id })
    }

    pub fn allows(&self, user_id: u64) -> bool {
        self.owner_id.map_or(true, |owner| owner == user_id)
    }
}

impl ComponentAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            COMPLETE_BUTTON_ID => Some(Self::Complete),
            DELETE_BUTTON_ID => Some(Self::Delete),
            CLOSE_DM_BUTTON_ID => Some(Self::Close),
            _ => None,
        }
    }

    /// Apply the reminder side of this action for a bookmark message.
    pub fn apply(&self, scheduler: &ReminderScheduler, message_id: &str) {
        let result = match self {
            Self::Complete => scheduler.complete(message_id),
            Self::Delete | Self::Close => scheduler.cancel(message_id),
        };
        if let Err(e) = result {
            error!("Failed to update reminder for bookmark {message_id}: {e}");
        }
    }
}

/// Handler for bookmark button presses
pub struct MessageComponentHandler {
    scheduler: ReminderScheduler,
}

impl MessageComponentHandler {
    pub fn new(scheduler: ReminderScheduler) -> Self {
        Self { scheduler }
    }

    pub async fn handle_component_interaction(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let Some(press) = ComponentPress::from_custom_id(custom_id) else {
            debug!("Ignoring component interaction: {custom_id}");
            return Ok(());
        };

        if !press.allows(interaction.user.id.0) {
            warn!(
                "User {} pressed {custom_id} on a bookmark they do not own",
                interaction.user.id
            );
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|data| {
                            data.content(NOT_OWNER_REPLY).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        info!(
            "Processing component interaction: {custom_id} from user: {}",
            interaction.user.id
        );

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredUpdateMessage)
            })
            .await?;

        let message_id = interaction.message.id;
        if let Err(e) = interaction
            .channel_id
            .delete_message(&ctx.http, message_id)
            .await
        {
            error!("Failed to delete bookmark message {message_id}: {e}");
        }

        press.action.apply(&self.scheduler, &message_id.to_string());
        Ok(())
    }
}
