// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use lifehub::config::Config;
use lifehub::db::{FirestoreDb, HabitStore, MemoryHabitStore};
use lifehub::middleware::auth::{create_jwt, AuthUser};
use lifehub::routes::create_router;
use lifehub::services::{HabitService, Notifier, Reminder, ReminderScheduler, YoutubeClient};
use lifehub::AppState;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// One delivered reminder, stamped with tokio's (possibly paused) clock.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentReminder {
    pub reminder: Reminder,
    pub recipient: String,
    pub at: Instant,
}

/// Notifier that records instead of mailing.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentReminder>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentReminder> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, reminder: &Reminder, recipient: &str) {
        self.sent.lock().unwrap().push(SentReminder {
            reminder: reminder.clone(),
            recipient: recipient.to_string(),
            at: Instant::now(),
        });
    }
}

/// Habit service over an in-memory store with a recording notifier.
#[allow(dead_code)]
pub struct TestHabits {
    pub service: HabitService,
    pub store: Arc<MemoryHabitStore>,
    pub scheduler: Arc<ReminderScheduler>,
    pub notifier: Arc<RecordingNotifier>,
}

#[allow(dead_code)]
pub fn test_habits() -> TestHabits {
    let store = Arc::new(MemoryHabitStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let scheduler = Arc::new(ReminderScheduler::new(notifier.clone()));
    let service = HabitService::new(store.clone() as Arc<dyn HabitStore>, scheduler.clone());
    TestHabits {
        service,
        store,
        scheduler,
        notifier,
    }
}

#[allow(dead_code)]
pub fn test_user(user_id: &str) -> AuthUser {
    AuthUser {
        user_id: user_id.to_string(),
        email: format!("{}@example.com", user_id),
    }
}

/// Create a session JWT for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, &format!("{}@example.com", user_id), signing_key)
        .expect("Failed to sign test JWT")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let habits = test_habits();
    let youtube = YoutubeClient::new(config.youtube_api_key.clone());

    let state = Arc::new(AppState {
        config,
        db: test_db_offline(),
        habits: habits.service,
        scheduler: habits.scheduler,
        youtube,
    });

    (create_router(state.clone()), state)
}
