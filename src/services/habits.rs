// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit confirmation and streak service.
//!
//! Wraps the pure rules on [`Habit`] with store I/O, ownership checks and
//! reminder registration.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::HabitStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Habit, HabitActivity};
use crate::services::ReminderScheduler;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Fields a user supplies when adding or editing a habit.
#[derive(Debug, Clone)]
pub struct HabitInput {
    pub name: String,
    pub description: String,
    pub frequency: u32,
    pub reminder_time: DateTime<Utc>,
}

impl HabitInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::Validation("Please fill out all fields.".to_string()));
        }
        if self.frequency == 0 {
            return Err(AppError::Validation(
                "Frequency must be at least one hour".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-habit locks serializing read-modify-write cycles within this process.
type HabitLocks = DashMap<String, Arc<Mutex<()>>>;

pub struct HabitService {
    store: Arc<dyn HabitStore>,
    scheduler: Arc<ReminderScheduler>,
    habit_locks: HabitLocks,
}

impl HabitService {
    pub fn new(store: Arc<dyn HabitStore>, scheduler: Arc<ReminderScheduler>) -> Self {
        Self {
            store,
            scheduler,
            habit_locks: DashMap::new(),
        }
    }

    /// Fetch a habit owned by `user`; other users' habits look missing.
    pub async fn get_habit(&self, user: &AuthUser, habit_id: &str) -> Result<Habit> {
        self.store
            .find_by_id(habit_id)
            .await?
            .filter(|h| h.user_id == user.user_id)
            .ok_or_else(|| AppError::NotFound("Habit not found!".to_string()))
    }

    /// Lock for one habit. Only call once the habit is known to exist.
    fn habit_lock(&self, habit_id: &str) -> Arc<Mutex<()>> {
        self.habit_locks
            .entry(habit_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Re-read an owned habit while holding its lock.
    ///
    /// A habit deleted in the meantime drops its lock entry.
    async fn reload_locked(&self, user: &AuthUser, habit_id: &str) -> Result<Habit> {
        let result = self.get_habit(user, habit_id).await;
        if let Err(AppError::NotFound(_)) = result {
            self.habit_locks.remove(habit_id);
        }
        result
    }

    /// Create a habit and register its reminder.
    pub async fn add_habit(&self, user: &AuthUser, input: HabitInput) -> Result<Habit> {
        input.validate()?;

        let habit = Habit::new(
            &user.user_id,
            input.name.trim().to_string(),
            input.description.trim().to_string(),
            input.frequency,
            input.reminder_time,
            Some(user.email.clone()),
        );
        self.store.create(&habit).await?;
        self.scheduler.schedule_habit(&habit, &user.email);

        tracing::info!(user_id = %user.user_id, habit_id = %habit.id, "Habit added");
        Ok(habit)
    }

    /// Replace the editable fields and re-register the reminder.
    pub async fn update_habit(
        &self,
        user: &AuthUser,
        habit_id: &str,
        input: HabitInput,
    ) -> Result<Habit> {
        input.validate()?;
        self.get_habit(user, habit_id).await?;

        let lock = self.habit_lock(habit_id);
        let _guard = lock.lock().await;

        let mut habit = self.reload_locked(user, habit_id).await?;
        habit.name = input.name.trim().to_string();
        habit.description = input.description.trim().to_string();
        habit.frequency = input.frequency;
        habit.reminder_time = input.reminder_time;

        self.store.update(&habit).await?;
        let recipient = habit.reminder_email.as_deref().unwrap_or(&user.email);
        self.scheduler.schedule_habit(&habit, recipient);

        tracing::info!(user_id = %user.user_id, habit_id, "Habit updated");
        Ok(habit)
    }

    /// Delete a habit and stop its reminder.
    pub async fn remove_habit(&self, user: &AuthUser, habit_id: &str) -> Result<()> {
        self.get_habit(user, habit_id).await?;

        let lock = self.habit_lock(habit_id);
        let _guard = lock.lock().await;

        let deleted = self.store.delete(habit_id).await;
        self.habit_locks.remove(habit_id);
        if !deleted? {
            return Err(AppError::NotFound(
                "No habit found with the provided ID.".to_string(),
            ));
        }
        self.scheduler.cancel_habit(habit_id);

        tracing::info!(user_id = %user.user_id, habit_id, "Habit removed");
        Ok(())
    }

    /// Accept a confirmation if the frequency window has elapsed.
    ///
    /// Exactly one store write on success; none on `TooSoon`.
    pub async fn confirm_habit(
        &self,
        user: &AuthUser,
        habit_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Habit> {
        self.get_habit(user, habit_id).await?;

        let lock = self.habit_lock(habit_id);
        let _guard = lock.lock().await;

        let mut habit = self.reload_locked(user, habit_id).await?;

        if let Some(wait) = habit.confirmation_wait(now) {
            tracing::debug!(
                habit_id,
                wait_secs = wait.num_seconds(),
                "Confirmation rejected, too soon"
            );
            return Err(AppError::TooSoon {
                frequency_hours: habit.frequency,
                retry_after_secs: wait.num_seconds().max(1),
            });
        }

        habit.apply_confirmation(now);
        self.store.update(&habit).await?;

        tracing::info!(
            user_id = %user.user_id,
            habit_id,
            today_count = habit.today_count,
            "Habit confirmed"
        );
        Ok(habit)
    }

    /// Advance the streak for `now`'s date and persist it.
    ///
    /// Works on a fresh copy read under the habit's lock, so a confirmation
    /// accepted after `habit` was loaded is kept. `habit` is replaced with
    /// the stored result. A habit deleted meanwhile is left as is.
    pub async fn recompute_streak(&self, habit: &mut Habit, now: DateTime<Utc>) -> Result<()> {
        let lock = self.habit_lock(&habit.id);
        let _guard = lock.lock().await;

        let Some(mut current) = self.store.find_by_id(&habit.id).await? else {
            self.habit_locks.remove(&habit.id);
            return Ok(());
        };
        if current.recompute_streak(now) {
            tracing::debug!(habit_id = %current.id, streak = current.streak, "Streak advanced");
        }
        self.store.update(&current).await?;
        *habit = current;
        Ok(())
    }

    /// List the user's habits, recomputing each streak first.
    pub async fn list_habits(&self, user: &AuthUser, now: DateTime<Utc>) -> Result<Vec<Habit>> {
        let habits = self.store.find_by_owner(&user.user_id).await?;

        stream::iter(habits)
            .map(|mut habit| async move {
                self.recompute_streak(&mut habit, now).await?;
                Ok::<_, AppError>(habit)
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await
    }

    /// Last confirmation and running count for one habit.
    pub async fn view_activity(&self, user: &AuthUser, habit_id: &str) -> Result<HabitActivity> {
        let habit = self.get_habit(user, habit_id).await?;
        Ok(HabitActivity::from(&habit))
    }

    /// Register reminders for every stored habit. Returns how many.
    pub async fn restore_reminders(&self) -> Result<usize> {
        let habits = self.store.list_all().await?;
        let mut scheduled = 0;
        for habit in &habits {
            match habit.reminder_email.as_deref() {
                Some(recipient) => {
                    self.scheduler.schedule_habit(habit, recipient);
                    scheduled += 1;
                }
                None => tracing::warn!(habit_id = %habit.id, "Habit has no reminder address"),
            }
        }
        tracing::info!(scheduled, total = habits.len(), "Habit reminders restored");
        Ok(scheduled)
    }
}
