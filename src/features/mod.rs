//! # Features
//!
//! - `bookmarks`: emoji preferences, their store, and bookmark rendering
//! - `reminders`: reminder parsing, scheduling and delivery

pub mod bookmarks;
pub mod reminders;
