//! User account and profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default picture for profiles without an upload.
pub const DEFAULT_PROFILE_PICTURE: &str = "uploads/default.png";

/// Registered account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique login handle
    pub username: String,
    /// Unique email address (reminder recipient)
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub date_registered: DateTime<Utc>,
}

/// Editable profile page, keyed by user ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    /// Path relative to the static root
    pub profile_picture: String,
}

impl Profile {
    /// Placeholder profile created on first view.
    pub fn placeholder(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: "New User".to_string(),
            address: String::new(),
            phone: String::new(),
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        }
    }
}
