//! Database layer (Firestore, plus an in-memory habit store).

pub mod firestore;
pub mod habit_store;

pub use firestore::FirestoreDb;
pub use habit_store::{HabitStore, MemoryHabitStore};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFILES: &str = "profiles";
    pub const TODOS: &str = "todos";
    pub const HABITS: &str = "habits";
    pub const EVENTS: &str = "events";
    pub const ACTIVITY_LOGS: &str = "activity_logs";
}
