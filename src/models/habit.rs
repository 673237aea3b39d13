// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Habit model: confirmation cadence and streak bookkeeping.
//!
//! The rules here are pure; `services::habits` wraps them with store I/O.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::time_utils::date_key;

/// Habit record stored in the `habits` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Opaque identifier (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub name: String,
    pub description: String,
    /// Minimum hours between two accepted confirmations
    pub frequency: u32,
    /// Number of days with at least one confirmation
    #[serde(default)]
    pub streak: u32,
    /// Last streak recompute
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_confirmed: Option<DateTime<Utc>>,
    /// Confirmations per calendar day ("YYYY-MM-DD"); only the day of the
    /// latest confirmation is kept
    #[serde(default)]
    pub confirmation_count: HashMap<String, u32>,
    /// Running count of accepted confirmations
    #[serde(default)]
    pub today_count: u32,
    /// Next reminder due time
    pub reminder_time: DateTime<Utc>,
    /// Day the streak was last incremented
    #[serde(default)]
    pub last_streak_date: Option<NaiveDate>,
    /// Where reminders are mailed (owner's address at creation time)
    #[serde(default)]
    pub reminder_email: Option<String>,
}

impl Habit {
    /// Build a fresh habit: zero streak, no confirmations.
    pub fn new(
        user_id: &str,
        name: String,
        description: String,
        frequency: u32,
        reminder_time: DateTime<Utc>,
        reminder_email: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name,
            description,
            frequency,
            streak: 0,
            last_updated: None,
            last_confirmed: None,
            confirmation_count: HashMap::new(),
            today_count: 0,
            reminder_time,
            last_streak_date: None,
            reminder_email,
        }
    }

    /// Confirmation window length.
    pub fn frequency_window(&self) -> Duration {
        Duration::hours(i64::from(self.frequency))
    }

    /// Remaining wait before another confirmation is accepted.
    ///
    /// `None` means a confirmation at `now` is allowed.
    pub fn confirmation_wait(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_confirmed?;
        let elapsed = now - last;
        let window = self.frequency_window();
        if elapsed < window {
            Some(window - elapsed)
        } else {
            None
        }
    }

    /// Record an accepted confirmation at `now`.
    ///
    /// Entries for earlier days are dropped.
    pub fn apply_confirmation(&mut self, now: DateTime<Utc>) {
        let today = date_key(now);
        self.last_confirmed = Some(now);
        self.today_count += 1;
        self.confirmation_count.retain(|day, _| *day == today);
        *self.confirmation_count.entry(today).or_insert(0) += 1;
    }

    /// Confirmations recorded for the calendar day of `now`.
    pub fn confirmations_on(&self, now: DateTime<Utc>) -> u32 {
        self.confirmation_count
            .get(&date_key(now))
            .copied()
            .unwrap_or(0)
    }

    /// Advance the streak for today's confirmations.
    ///
    /// Increments at most once per calendar day. Always stamps
    /// `last_updated`. Returns whether the streak moved.
    pub fn recompute_streak(&mut self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        let advanced = self.confirmations_on(now) > 0 && self.last_streak_date != Some(today);
        if advanced {
            self.streak += 1;
            self.last_streak_date = Some(today);
        }
        self.last_updated = Some(now);
        advanced
    }
}

/// Confirmation summary shown on the activity view.
#[derive(Debug, Clone, Serialize)]
pub struct HabitActivity {
    pub habit_id: String,
    pub name: String,
    pub last_confirmed: Option<DateTime<Utc>>,
    pub today_count: u32,
}

impl From<&Habit> for HabitActivity {
    fn from(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            last_confirmed: habit.last_confirmed,
            today_count: habit.today_count,
        }
    }
}
