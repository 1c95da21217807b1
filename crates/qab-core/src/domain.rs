use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Internal id of a `users` row.
///
/// The database may hand it out as a number or as a string (uuid); we keep the
/// textual form since it is only ever echoed back in filters and callback data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowId(pub String);

impl RowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = serde_json::Value::deserialize(deserializer)?;
        match v {
            serde_json::Value::String(s) => Ok(RowId(s)),
            serde_json::Value::Number(n) => Ok(RowId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number row id, got {other}"
            ))),
        }
    }
}

/// The sender of a command or callback, as seen by the bot.
#[derive(Clone, Debug)]
pub struct Sender {
    pub user_id: UserId,
    pub first_name: String,
}

/// A row of the `users` relation.
#[derive(Clone, Debug, Deserialize)]
pub struct UserRecord {
    pub id: RowId,
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Username if set, otherwise the Telegram id.
    pub fn display_name(&self) -> String {
        match self.username.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => self.telegram_id.to_string(),
        }
    }

    /// Registration date (`YYYY-MM-DD`), i.e. the first ten characters of `created_at`.
    pub fn registered_on(&self) -> String {
        self.created_at
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(10)
            .collect()
    }
}

/// A row of the `user_activations` relation.
#[derive(Clone, Debug, Deserialize)]
pub struct ActivationRecord {
    pub user_id: RowId,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub activated_by: Option<String>,
    #[serde(default)]
    pub activated_at: Option<String>,
}

impl ActivationRecord {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }
}

/// A user together with its derived activation state (no activation row = inactive).
#[derive(Clone, Debug)]
pub struct UserSummary {
    pub user: UserRecord,
    pub is_active: bool,
}

/// Single-row mutation of `user_activations`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationChange {
    Activate { by: UserId, at: DateTime<Utc> },
    Deactivate,
}

/// Aggregate counts shown by the admin `stats` view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
}

impl Stats {
    pub fn inactive(&self) -> usize {
        self.total.saturating_sub(self.active)
    }

    /// Percentage of active users, `None` when there are no users at all.
    pub fn activation_rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.active as f64 / self.total as f64 * 100.0)
    }
}
