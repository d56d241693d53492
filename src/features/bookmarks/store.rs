//! # Preference Store
//!
//! Per-user emoji bookmark preferences backed by a single JSON file.
//!
//! Every mutation builds the next snapshot from a copy, writes it atomically,
//! and only then swaps it into memory. A failed write leaves the in-memory map
//! exactly as it was, so memory and disk never disagree after a call returns.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Atomic snapshot writes with rollback
//! - 1.0.0: Initial JSON-backed store

use log::{debug, error, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use super::preference::{EmojiPreference, UserPreferences};
use crate::core::persist::{read_json, write_json_atomic, PersistError};

type Snapshot = BTreeMap<String, UserPreferences>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user id and emoji must not be empty")]
    EmptyKey,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Durable (user, emoji) -> preference map
pub struct PreferenceStore {
    path: PathBuf,
    prefs: RwLock<Snapshot>,
}

impl PreferenceStore {
    /// Load the store from `path`; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let loaded: Snapshot = read_json(&path)?;
        let prefs: Snapshot = loaded
            .into_iter()
            .map(|(user, prefs)| (user, prefs.normalized()))
            .filter(|(_, prefs)| !prefs.emojis.is_empty())
            .collect();

        info!(
            "Loaded bookmark preferences for {} users from {}",
            prefs.len(),
            path.display()
        );

        Ok(Self {
            path,
            prefs: RwLock::new(prefs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All preferences of one user, or `None` when the user has none.
    pub fn get(&self, user_id: &str) -> Option<UserPreferences> {
        self.read()
            .get(user_id)
            .cloned()
            .map(UserPreferences::normalized)
    }

    pub fn get_emoji(&self, user_id: &str, emoji: &str) -> Option<EmojiPreference> {
        self.read()
            .get(user_id)
            .and_then(|prefs| prefs.emojis.get(emoji))
            .cloned()
            .map(EmojiPreference::normalized)
    }

    /// Insert or replace one emoji preference and persist the whole store.
    pub fn set_emoji(
        &self,
        user_id: &str,
        emoji: &str,
        pref: EmojiPreference,
    ) -> Result<(), StoreError> {
        if user_id.is_empty() || emoji.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let mut prefs = self.write();
        let mut next = prefs.clone();
        next.entry(user_id.to_string())
            .or_default()
            .emojis
            .insert(emoji.to_string(), pref.normalized());

        self.commit(&mut prefs, next)?;
        debug!("Saved bookmark emoji {emoji} for user {user_id}");
        Ok(())
    }

    /// Remove one emoji preference; drops the user once their last emoji is gone.
    ///
    /// Returns whether anything was removed.
    pub fn delete_emoji(&self, user_id: &str, emoji: &str) -> Result<bool, StoreError> {
        let mut prefs = self.write();
        let exists = prefs
            .get(user_id)
            .is_some_and(|user| user.emojis.contains_key(emoji));
        if !exists {
            return Ok(false);
        }

        let mut next = prefs.clone();
        if let Some(user) = next.get_mut(user_id) {
            user.emojis.remove(emoji);
            if user.emojis.is_empty() {
                next.remove(user_id);
            }
        }

        self.commit(&mut prefs, next)?;
        debug!("Removed bookmark emoji {emoji} for user {user_id}");
        Ok(true)
    }

    fn commit(&self, current: &mut Snapshot, next: Snapshot) -> Result<(), StoreError> {
        if let Err(e) = write_json_atomic(&self.path, &next) {
            error!("Failed to persist bookmark preferences: {e}");
            return Err(e.into());
        }
        *current = next;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.prefs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.prefs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::bookmarks::preference::{BookmarkMode, Destination};
    use crate::features::reminders::{ReminderKind, ReminderSpec};
    use std::fs;

    fn lightweight_with_reminder() -> EmojiPreference {
        EmojiPreference {
            mode: BookmarkMode::Lightweight,
            color: None,
            destination: Destination::Dm,
            reminder: Some(ReminderSpec::new(ReminderKind::Duration { seconds: 1_800 })),
        }
    }

    #[test]
    fn test_set_then_get_returns_normalized_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("bookmarks.json")).unwrap();

        let pref = EmojiPreference {
            destination: Destination::Channel(String::new()),
            ..lightweight_with_reminder()
        };
        store.set_emoji("user", "⏰", pref).unwrap();

        let saved = store.get_emoji("user", "⏰").unwrap();
        assert_eq!(saved.destination, Destination::Dm);
        assert_eq!(saved.mode, BookmarkMode::Lightweight);
        assert!(saved.reminder.unwrap().remove_on_complete);
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");

        let store = PreferenceStore::open(&path).unwrap();
        store
            .set_emoji("user", "📌", EmojiPreference::new(BookmarkMode::Complete))
            .unwrap();
        store.set_emoji("user", "⏰", lightweight_with_reminder()).unwrap();
        drop(store);

        let reopened = PreferenceStore::open(&path).unwrap();
        let prefs = reopened.get("user").unwrap();
        assert_eq!(prefs.emojis.len(), 2);
        assert_eq!(prefs.emojis["⏰"], lightweight_with_reminder());
    }

    #[test]
    fn test_deleting_last_emoji_removes_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        let store = PreferenceStore::open(&path).unwrap();

        store
            .set_emoji("user", "📌", EmojiPreference::new(BookmarkMode::Balanced))
            .unwrap();
        assert!(store.delete_emoji("user", "📌").unwrap());
        assert!(store.get("user").is_none());
        assert!(!store.delete_emoji("user", "📌").unwrap());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({}));
    }

    #[test]
    fn test_delete_keeps_other_emojis() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("bookmarks.json")).unwrap();

        store
            .set_emoji("user", "📌", EmojiPreference::new(BookmarkMode::Balanced))
            .unwrap();
        store.set_emoji("user", "⏰", lightweight_with_reminder()).unwrap();

        assert!(store.delete_emoji("user", "📌").unwrap());
        let prefs = store.get("user").unwrap();
        assert_eq!(prefs.emojis.keys().collect::<Vec<_>>(), vec!["⏰"]);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = PreferenceStore::open(data_dir.join("bookmarks.json")).unwrap();

        store
            .set_emoji("user", "📌", EmojiPreference::new(BookmarkMode::Balanced))
            .unwrap();

        // Replace the data directory with a plain file so writes fail
        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, "not a directory").unwrap();

        assert!(store
            .set_emoji("user", "⏰", lightweight_with_reminder())
            .is_err());
        assert!(store.get_emoji("user", "⏰").is_none());

        assert!(store.delete_emoji("user", "📌").is_err());
        assert!(store.get_emoji("user", "📌").is_some());
    }

    #[test]
    fn test_empty_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("bookmarks.json")).unwrap();

        let result = store.set_emoji("", "📌", EmojiPreference::default());
        assert!(matches!(result, Err(StoreError::EmptyKey)));
    }

    #[test]
    fn test_open_normalizes_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(
            &path,
            r#"{
                "user": { "emojis": { "📌": { "mode": "complete", "destination": "channel", "channelId": "" } } },
                "empty": { "emojis": {} }
            }"#,
        )
        .unwrap();

        let store = PreferenceStore::open(&path).unwrap();
        let pref = store.get_emoji("user", "📌").unwrap();
        assert_eq!(pref.mode, BookmarkMode::Complete);
        assert_eq!(pref.destination, Destination::Dm);
        assert!(store.get("empty").is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PreferenceStore::open(&path),
            Err(StoreError::Persist(PersistError::Parse { .. }))
        ));
    }
}
