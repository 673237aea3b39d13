// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts) and profiles
//! - Todos
//! - Habits (via the [`HabitStore`] trait)
//! - Events and activity logs

use async_trait::async_trait;

use crate::db::collections;
use crate::db::habit_store::HabitStore;
use crate::error::AppError;
use crate::models::{ActivityLog, Event, Habit, Profile, Todo, TodoFilter, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Write `object` as document `doc_id` of `collection`.
    async fn put<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, collection: &str, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// First document whose `field` equals `value`.
    async fn find_one_by<T>(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> Result<Option<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let value = value.to_string();
        let found: Vec<T> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.field(field).eq(value.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.into_iter().next())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one_by(collections::USERS, "email", email).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_one_by(collections::USERS, "username", username)
            .await
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        self.put(collections::USERS, &user.id, user).await
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.put(collections::PROFILES, &profile.user_id, profile)
            .await
    }

    // ─── Todo Operations ─────────────────────────────────────────

    /// Todos owned by `user_id`, newest first.
    pub async fn list_todos(
        &self,
        user_id: &str,
        filter: TodoFilter,
    ) -> Result<Vec<Todo>, AppError> {
        let user_id = user_id.to_string();
        let completed = filter.completed();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::TODOS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    completed.and_then(|c| q.field("completed").eq(c)),
                ])
            })
            .order_by([(
                "date_created",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_todo(&self, todo_id: &str) -> Result<Option<Todo>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TODOS)
            .obj()
            .one(todo_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a todo.
    pub async fn set_todo(&self, todo: &Todo) -> Result<(), AppError> {
        self.put(collections::TODOS, &todo.id, todo).await
    }

    pub async fn delete_todo(&self, todo_id: &str) -> Result<(), AppError> {
        self.remove(collections::TODOS, todo_id).await
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Events owned by `user_id`, soonest first.
    pub async fn list_events(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let user_id = user_id.to_string();
        let mut events: Vec<Event> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    pub async fn set_event(&self, event: &Event) -> Result<(), AppError> {
        self.put(collections::EVENTS, &event.id, event).await
    }

    // ─── Activity Log Operations ─────────────────────────────────

    /// Activity logs owned by `user_id`, newest first.
    pub async fn list_activity_logs(&self, user_id: &str) -> Result<Vec<ActivityLog>, AppError> {
        let user_id = user_id.to_string();
        let mut logs: Vec<ActivityLog> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY_LOGS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }

    pub async fn add_activity_log(&self, log: &ActivityLog) -> Result<(), AppError> {
        self.put(collections::ACTIVITY_LOGS, &log.id, log).await
    }
}

// ─── Habit Operations ────────────────────────────────────────────

#[async_trait]
impl HabitStore for FirestoreDb {
    async fn create(&self, habit: &Habit) -> Result<(), AppError> {
        self.put(collections::HABITS, &habit.id, habit).await
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Habit>, AppError> {
        let user_id = user_id.to_string();
        let mut habits: Vec<Habit> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::HABITS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        habits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(habits)
    }

    async fn find_by_id(&self, habit_id: &str) -> Result<Option<Habit>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::HABITS)
            .obj()
            .one(habit_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn update(&self, habit: &Habit) -> Result<(), AppError> {
        self.put(collections::HABITS, &habit.id, habit).await
    }

    async fn delete(&self, habit_id: &str) -> Result<bool, AppError> {
        if HabitStore::find_by_id(self, habit_id).await?.is_none() {
            return Ok(false);
        }
        self.remove(collections::HABITS, habit_id).await?;
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<Habit>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::HABITS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
