//! To-do item model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Priority levels offered by the to-do form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// To-do item stored in the `todos` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    pub date_created: DateTime<Utc>,
}

/// List filter for `GET /api/todos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    #[default]
    All,
    Completed,
    NotCompleted,
}

impl TodoFilter {
    /// Value the `completed` field must equal, if any.
    pub fn completed(self) -> Option<bool> {
        match self {
            TodoFilter::All => None,
            TodoFilter::Completed => Some(true),
            TodoFilter::NotCompleted => Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        let f: TodoFilter = serde_json::from_str("\"not_completed\"").unwrap();
        assert_eq!(f, TodoFilter::NotCompleted);
        assert_eq!(f.completed(), Some(false));
        assert_eq!(TodoFilter::default().completed(), None);
    }
}
