//! Calendar event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar event with a one-shot email reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub reminder_time: DateTime<Utc>,
    /// Reminder recipient
    pub email: String,
}
