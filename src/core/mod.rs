//! # Core Module
//!
//! Configuration, durable JSON persistence, Discord text limits and shared
//! embed builders.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add persist module with atomic snapshot writes
//! - 1.1.0: Add embeds module with reminder embed and jump links
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod embeds;
pub mod persist;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use persist::{read_json, write_json_atomic, PersistError};
pub use response::{
    snippet, truncate_chars, truncate_for_embed, truncate_for_field, truncate_for_message,
    EMBED_LIMIT, FIELD_LIMIT, MESSAGE_LIMIT,
};
