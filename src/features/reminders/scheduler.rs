//! # Reminder Scheduler
//!
//! In-memory registry of pending bookmark reminders, one timer task per entry,
//! mirrored to a JSON file after every mutation so pending reminders survive a
//! restart.
//!
//! Every registry mutation and its file write happen under one mutex. The
//! snapshot is written before the in-memory change is committed, so a failed
//! write leaves both sides untouched. Delivery removes the entry and persists
//! before sending, making delivery at-most-once across restarts.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: One timer per reminder with generation checks; restore on construction
//! - 1.0.0: Initial polling scheduler

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::task::JoinHandle;

use super::delivery::{ReminderPayload, ReminderSender};
use crate::core::persist::{read_json, write_json_atomic, PersistError};

/// Delay used for reminders that are already due
const MIN_DELAY_SECS: i64 = 1;

/// On-disk form of one pending reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedReminder {
    when: String,
    #[serde(default)]
    remove_on_complete: bool,
    #[serde(default)]
    payload: ReminderPayload,
}

struct ScheduledReminder {
    when: DateTime<Utc>,
    remove_on_complete: bool,
    payload: ReminderPayload,
    /// Distinguishes this entry from any later replacement under the same id
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl ScheduledReminder {
    fn to_persisted(&self) -> PersistedReminder {
        PersistedReminder {
            when: self.when.to_rfc3339_opts(SecondsFormat::Nanos, true),
            remove_on_complete: self.remove_on_complete,
            payload: self.payload.clone(),
        }
    }

    fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[derive(Default)]
struct Registry {
    entries: HashMap<String, ScheduledReminder>,
    next_generation: u64,
}

struct Inner {
    path: PathBuf,
    registry: Mutex<Registry>,
    sender: Arc<dyn ReminderSender>,
}

/// Process-wide reminder registry. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ReminderScheduler {
    inner: Arc<Inner>,
}

impl ReminderScheduler {
    /// Create the scheduler and re-arm every reminder persisted at `path`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        path: impl Into<PathBuf>,
        sender: Arc<dyn ReminderSender>,
    ) -> Result<Self, PersistError> {
        let scheduler = Self {
            inner: Arc::new(Inner {
                path: path.into(),
                registry: Mutex::new(Registry::default()),
                sender,
            }),
        };
        scheduler.restore()?;
        Ok(scheduler)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Register (or replace) the reminder for a bookmark message.
    ///
    /// Due or overdue fire times are clamped to one second from now.
    pub fn schedule(
        &self,
        message_id: &str,
        when: DateTime<Utc>,
        payload: ReminderPayload,
        remove_on_complete: bool,
    ) -> Result<(), PersistError> {
        if message_id.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let when = if when <= now {
            now + Duration::seconds(MIN_DELAY_SECS)
        } else {
            when
        };

        let mut registry = self.inner.lock();
        let generation = registry.next_generation;
        let mut entry = ScheduledReminder {
            when,
            remove_on_complete,
            payload,
            generation,
            timer: None,
        };

        let mut snapshot = self.inner.snapshot(&registry);
        snapshot.insert(message_id.to_string(), entry.to_persisted());
        self.inner.write(&snapshot)?;

        registry.next_generation += 1;
        entry.timer = Some(self.inner.arm(message_id, generation, when));
        if let Some(mut previous) = registry.entries.insert(message_id.to_string(), entry) {
            previous.stop();
            debug!("Replaced pending reminder for message {message_id}");
        }

        info!("⏰ Scheduled reminder for message {message_id} at {when}");
        Ok(())
    }

    /// Stop and forget the reminder for `message_id`. No-op when absent.
    pub fn cancel(&self, message_id: &str) -> Result<(), PersistError> {
        let mut registry = self.inner.lock();
        self.inner.cancel_locked(&mut registry, message_id)
    }

    /// Handle the bookmark's "Done" action.
    ///
    /// Cancels the reminder only when it was configured to be removed on completion;
    /// otherwise it stays pending and fires as scheduled.
    pub fn complete(&self, message_id: &str) -> Result<(), PersistError> {
        let mut registry = self.inner.lock();
        let remove = match registry.entries.get(message_id) {
            Some(entry) => entry.remove_on_complete,
            None => return Ok(()),
        };

        if remove {
            self.inner.cancel_locked(&mut registry, message_id)
        } else {
            debug!("Reminder for message {message_id} kept after completion");
            Ok(())
        }
    }

    /// Stop every pending timer without touching the registry or its file.
    ///
    /// Used at shutdown; the next process start re-arms everything from disk.
    pub fn close(&self) {
        let mut registry = self.inner.lock();
        for entry in registry.entries.values_mut() {
            entry.stop();
        }
        info!("Stopped {} reminder timer(s)", registry.entries.len());
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.inner.lock().entries.contains_key(message_id)
    }

    /// Fire time of a pending reminder
    pub fn fire_time(&self, message_id: &str) -> Option<DateTime<Utc>> {
        self.inner.lock().entries.get(message_id).map(|e| e.when)
    }

    fn restore(&self) -> Result<(), PersistError> {
        let persisted: BTreeMap<String, Value> = read_json(&self.inner.path)?;
        if persisted.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut registry = self.inner.lock();
        let mut restored = 0usize;

        for (message_id, raw) in persisted {
            let stored: PersistedReminder = match serde_json::from_value(raw) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!("Skipping reminder for message {message_id}: malformed entry: {e}");
                    continue;
                }
            };
            let when = match DateTime::parse_from_rfc3339(&stored.when) {
                Ok(when) => when.with_timezone(&Utc),
                Err(e) => {
                    warn!(
                        "Skipping reminder for message {message_id}: unreadable time '{}': {e}",
                        stored.when
                    );
                    continue;
                }
            };
            let when = if when > now {
                when
            } else {
                now + Duration::seconds(MIN_DELAY_SECS)
            };

            let generation = registry.next_generation;
            registry.next_generation += 1;
            let timer = self.inner.arm(&message_id, generation, when);
            registry.entries.insert(
                message_id,
                ScheduledReminder {
                    when,
                    remove_on_complete: stored.remove_on_complete,
                    payload: stored.payload,
                    generation,
                    timer: Some(timer),
                },
            );
            restored += 1;
        }

        info!(
            "Restored {restored} pending reminder(s) from {}",
            self.inner.path.display()
        );
        Ok(())
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cancel_locked(&self, registry: &mut Registry, message_id: &str) -> Result<(), PersistError> {
        if !registry.entries.contains_key(message_id) {
            return Ok(());
        }

        let mut snapshot = self.snapshot(registry);
        snapshot.remove(message_id);
        self.write(&snapshot)?;

        if let Some(mut entry) = registry.entries.remove(message_id) {
            entry.stop();
        }
        info!("Cancelled reminder for message {message_id}");
        Ok(())
    }

    fn snapshot(&self, registry: &Registry) -> BTreeMap<String, PersistedReminder> {
        registry
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.to_persisted()))
            .collect()
    }

    fn write(&self, snapshot: &BTreeMap<String, PersistedReminder>) -> Result<(), PersistError> {
        write_json_atomic(&self.path, snapshot).map_err(|e| {
            error!("Failed to persist reminders: {e}");
            e
        })
    }

    /// Spawn the timer task for one registry entry
    fn arm(self: &Arc<Self>, message_id: &str, generation: u64, when: DateTime<Utc>) -> JoinHandle<()> {
        let delay = (when - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(MIN_DELAY_SECS as u64));
        let inner: Weak<Inner> = Arc::downgrade(self);
        let message_id = message_id.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                inner.deliver(&message_id, generation).await;
            }
        })
    }

    async fn deliver(&self, message_id: &str, generation: u64) {
        let entry = {
            let mut registry = self.lock();
            match registry.entries.get(message_id) {
                Some(entry) if entry.generation == generation => {}
                // Cancelled or replaced while this timer was firing
                _ => return,
            }
            let entry = registry.entries.remove(message_id);
            let snapshot = self.snapshot(&registry);
            if let Err(e) = self.write(&snapshot) {
                warn!("Reminder for message {message_id} delivered without persisting removal: {e}");
            }
            entry
        };

        let Some(entry) = entry else {
            return;
        };

        if let Err(e) = self.sender.send_reminder(&entry.payload).await {
            error!("Failed to deliver reminder for message {message_id}: {e:#}");
        }
    }
}
