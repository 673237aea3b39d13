// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit persistence seam.
//!
//! The confirmation engine only talks to habits through [`HabitStore`], so it
//! runs the same against Firestore and the in-memory map.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::models::Habit;

/// CRUD access to habit documents.
///
/// Writes are whole-document; atomicity is per document only.
#[async_trait]
pub trait HabitStore: Send + Sync {
    async fn create(&self, habit: &Habit) -> Result<()>;

    /// Habits owned by `user_id`, ordered by name.
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Habit>>;

    async fn find_by_id(&self, habit_id: &str) -> Result<Option<Habit>>;

    /// Overwrite the stored document with `habit`.
    async fn update(&self, habit: &Habit) -> Result<()>;

    /// Returns `false` if nothing was stored under `habit_id`.
    async fn delete(&self, habit_id: &str) -> Result<bool>;

    /// Every stored habit (reminder reload at startup).
    async fn list_all(&self) -> Result<Vec<Habit>>;
}

/// Process-local habit store.
#[derive(Default)]
pub struct MemoryHabitStore {
    habits: DashMap<String, Habit>,
}

impl MemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

#[async_trait]
impl HabitStore for MemoryHabitStore {
    async fn create(&self, habit: &Habit) -> Result<()> {
        self.habits.insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Habit>> {
        let mut habits: Vec<Habit> = self
            .habits
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        habits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(habits)
    }

    async fn find_by_id(&self, habit_id: &str) -> Result<Option<Habit>> {
        Ok(self.habits.get(habit_id).map(|h| h.value().clone()))
    }

    async fn update(&self, habit: &Habit) -> Result<()> {
        self.habits.insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    async fn delete(&self, habit_id: &str) -> Result<bool> {
        Ok(self.habits.remove(habit_id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Habit>> {
        Ok(self.habits.iter().map(|h| h.value().clone()).collect())
    }
}
