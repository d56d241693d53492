// Core layer - configuration, persistence and shared helpers
pub mod core;

// Features layer - bookmarks and reminders
pub mod features;

// Event handlers
pub mod message_components;
pub mod reactions;

// Application layer
pub mod command_handler;
pub mod commands;

pub use crate::core::Config;

pub use features::bookmarks::{EmojiPreference, PreferenceStore};
pub use features::reminders::ReminderScheduler;
