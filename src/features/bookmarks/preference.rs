//! Emoji bookmark preferences and their on-disk record format
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Channel destinations
//! - 1.1.0: Optional reminder per emoji
//! - 1.0.0: Mode and color per emoji

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::features::reminders::{ReminderKind, ReminderSpec};

/// How much of the original message a bookmark keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookmarkMode {
    /// Condensed embed for quick review
    Lightweight,
    #[default]
    Balanced,
    /// Everything available from the original message
    Complete,
}

impl BookmarkMode {
    pub const ALL: [BookmarkMode; 3] = [
        BookmarkMode::Lightweight,
        BookmarkMode::Balanced,
        BookmarkMode::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkMode::Lightweight => "lightweight",
            BookmarkMode::Balanced => "balanced",
            BookmarkMode::Complete => "complete",
        }
    }

    /// Label used for slash command choices
    pub fn label(&self) -> &'static str {
        match self {
            BookmarkMode::Lightweight => "👀 Lightweight",
            BookmarkMode::Balanced => "🔖 Balanced",
            BookmarkMode::Complete => "📌 Complete",
        }
    }
}

impl fmt::Display for BookmarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lightweight" => Ok(BookmarkMode::Lightweight),
            "balanced" => Ok(BookmarkMode::Balanced),
            "complete" => Ok(BookmarkMode::Complete),
            _ => Err("invalid mode. choose lightweight, balanced, or complete".to_string()),
        }
    }
}

/// Where bookmark copies are delivered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Dm,
    /// A specific channel, by id
    Channel(String),
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Dm => "dm",
            Destination::Channel(_) => "channel",
        }
    }

    pub fn channel_id(&self) -> Option<&str> {
        match self {
            Destination::Dm => None,
            Destination::Channel(id) => Some(id.as_str()),
        }
    }

    /// A channel destination without a usable id falls back to DMs.
    pub fn normalized(self) -> Self {
        match self {
            Destination::Channel(id) if id.trim().is_empty() => Destination::Dm,
            Destination::Channel(id) => Destination::Channel(id.trim().to_string()),
            Destination::Dm => Destination::Dm,
        }
    }
}

/// Configuration for one bookmark emoji
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PreferenceRecord", into = "PreferenceRecord")]
pub struct EmojiPreference {
    pub mode: BookmarkMode,
    /// RGB override for the bookmark embed accent
    pub color: Option<u32>,
    pub destination: Destination,
    pub reminder: Option<ReminderSpec>,
}

impl EmojiPreference {
    pub fn new(mode: BookmarkMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.destination = self.destination.normalized();
        self
    }
}

/// All emoji preferences of one user, keyed by normalized emoji
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub emojis: BTreeMap<String, EmojiPreference>,
}

impl UserPreferences {
    pub fn normalized(mut self) -> Self {
        self.emojis = self
            .emojis
            .into_iter()
            .map(|(emoji, pref)| (emoji, pref.normalized()))
            .collect();
        self
    }
}

/// File form of [`EmojiPreference`]; tolerant of older files missing fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PreferenceRecord {
    mode: String,
    color: u32,
    has_color: bool,
    destination: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reminder: Option<ReminderRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReminderRecord {
    mode: String,
    hour: u32,
    minute: u32,
    duration_seconds: u64,
    remove_on_complete: bool,
}

const REMINDER_TIME_OF_DAY: &str = "time_of_day";
const REMINDER_DURATION: &str = "duration";

impl From<PreferenceRecord> for EmojiPreference {
    fn from(record: PreferenceRecord) -> Self {
        let destination = if record.destination.eq_ignore_ascii_case("channel") {
            Destination::Channel(record.channel_id)
        } else {
            Destination::Dm
        };

        EmojiPreference {
            mode: record.mode.parse().unwrap_or_default(),
            color: record.has_color.then_some(record.color),
            destination,
            reminder: record.reminder.and_then(ReminderRecord::into_spec),
        }
        .normalized()
    }
}

impl From<EmojiPreference> for PreferenceRecord {
    fn from(pref: EmojiPreference) -> Self {
        let pref = pref.normalized();
        PreferenceRecord {
            mode: pref.mode.as_str().to_string(),
            color: pref.color.unwrap_or(0),
            has_color: pref.color.is_some(),
            destination: pref.destination.as_str().to_string(),
            channel_id: pref.destination.channel_id().unwrap_or_default().to_string(),
            reminder: pref.reminder.map(ReminderRecord::from_spec),
        }
    }
}

impl ReminderRecord {
    fn into_spec(self) -> Option<ReminderSpec> {
        let kind = match self.mode.as_str() {
            REMINDER_TIME_OF_DAY if self.hour <= 23 && self.minute <= 59 => ReminderKind::TimeOfDay {
                hour: self.hour,
                minute: self.minute,
            },
            REMINDER_DURATION if self.duration_seconds > 0 => ReminderKind::Duration {
                seconds: self.duration_seconds,
            },
            _ => return None,
        };

        Some(ReminderSpec {
            kind,
            remove_on_complete: self.remove_on_complete,
        })
    }

    fn from_spec(spec: ReminderSpec) -> Self {
        match spec.kind {
            ReminderKind::TimeOfDay { hour, minute } => ReminderRecord {
                mode: REMINDER_TIME_OF_DAY.to_string(),
                hour,
                minute,
                remove_on_complete: spec.remove_on_complete,
                ..Default::default()
            },
            ReminderKind::Duration { seconds } => ReminderRecord {
                mode: REMINDER_DURATION.to_string(),
                duration_seconds: seconds,
                remove_on_complete: spec.remove_on_complete,
                ..Default::default()
            },
        }
    }
}
