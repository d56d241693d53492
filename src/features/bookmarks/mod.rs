//! # Feature: Bookmarks
//!
//! React to a message with a configured emoji to receive a formatted copy of
//! it by DM or in a chosen channel.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Channel destinations
//! - 1.1.0: Reminders attached to emoji preferences
//! - 1.0.0: Initial release with three save modes

pub mod emoji;
pub mod preference;
pub mod render;
pub mod store;

pub use emoji::{display_emoji, normalize_emoji, reaction_key, split_emoji_input};
pub use preference::{BookmarkMode, Destination, EmojiPreference, UserPreferences};
pub use render::{
    button_custom_id, render, split_button_custom_id, RenderOptions, RenderedBookmark,
    SourceMessage, COMPLETE_BUTTON_ID, DELETE_BUTTON_ID,
};
pub use store::{PreferenceStore, StoreError};
