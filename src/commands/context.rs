//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Preference store and reminder scheduler
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;

use crate::features::bookmarks::PreferenceStore;
use crate::features::reminders::ReminderScheduler;

/// Services shared by every command, component and reaction handler
#[derive(Clone)]
pub struct CommandContext {
    pub store: Arc<PreferenceStore>,
    pub scheduler: ReminderScheduler,
}

impl CommandContext {
    pub fn new(store: Arc<PreferenceStore>, scheduler: ReminderScheduler) -> Self {
        Self { store, scheduler }
    }
}
