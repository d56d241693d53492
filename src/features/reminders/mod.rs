//! # Feature: Reminders
//!
//! Optional follow-up notifications for bookmarks: parsing of reminder text,
//! a persistent timer registry, and delivery to Discord.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: Restart-safe registry keyed by bookmark message id
//! - 1.0.0: Initial release

pub mod delivery;
pub mod parser;
pub mod scheduler;

pub use delivery::{DiscordReminderSender, ReminderPayload, ReminderSender};
pub use parser::{
    describe, format_duration, next, parse, ReminderInput, ReminderKind, ReminderParseError,
    ReminderSpec, Schedule,
};
pub use scheduler::ReminderScheduler;
