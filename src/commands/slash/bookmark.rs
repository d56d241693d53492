//! Bookmark slash command definitions

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::features::bookmarks::BookmarkMode;

pub const SET_BOOKMARK_COMMAND: &str = "set-bookmark";
pub const REMOVE_BOOKMARK_COMMAND: &str = "remove-bookmark";
pub const LIST_BOOKMARKS_COMMAND: &str = "list-bookmarks";
pub const HELP_COMMAND: &str = "bookmark-help";

/// Creates bookmark commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_set_bookmark_command(),
        create_remove_bookmark_command(),
        create_list_bookmarks_command(),
        create_help_command(),
    ]
}

/// Creates the set-bookmark command
fn create_set_bookmark_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(SET_BOOKMARK_COMMAND)
        .description("Choose how an emoji saves messages for you")
        .create_option(|option| {
            option
                .name("emoji")
                .description("Emoji to watch for when you react to a message")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("mode")
                .description("Save mode: lightweight, balanced, or complete")
                .kind(CommandOptionType::String)
                .required(true);
            for mode in BookmarkMode::ALL {
                option.add_string_choice(mode.label(), mode.as_str());
            }
            option
        })
        .create_option(|option| {
            option
                .name("color")
                .description("Hex color for the saved message embed (e.g. #ffcc00)")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("destination")
                .description("Where bookmarks are delivered")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("📬 Direct message", "dm")
                .add_string_choice("📺 Channel", "channel")
        })
        .create_option(|option| {
            option
                .name("channel")
                .description("Channel to deliver bookmarks to when destination is channel")
                .kind(CommandOptionType::Channel)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("reminder")
                .description("Optional reminder such as 08:00 or 45m (\"off\" clears it)")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("keep-reminder-on-complete")
                .description("Keep the reminder when pressing Done")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .to_owned()
}

/// Creates the remove-bookmark command
fn create_remove_bookmark_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(REMOVE_BOOKMARK_COMMAND)
        .description("Delete a saved emoji shortcut")
        .create_option(|option| {
            option
                .name("emoji")
                .description("Emoji to remove from your saved shortcuts")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// Creates the list-bookmarks command
fn create_list_bookmarks_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(LIST_BOOKMARKS_COMMAND)
        .description("Show the emojis and modes configured for your bookmarks")
        .to_owned()
}

/// Creates the bookmark-help command
fn create_help_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(HELP_COMMAND)
        .description("Show how to configure and use the bookmark bot")
        .to_owned()
}
