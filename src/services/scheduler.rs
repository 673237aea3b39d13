// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process reminder scheduler.
//!
//! Each registered reminder is a tokio task tracked by key. Registering the
//! same key again aborts the previous task, so a habit never has more than
//! one live reminder job.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::models::{Event, Habit};
use crate::services::notifier::{Notifier, Reminder};

/// How far ahead of the due time a habit reminder fires.
pub const REMINDER_LEAD_MINUTES: i64 = 10;

/// Delay until the first habit reminder.
///
/// The first fire is `reminder_time - 10 minutes`. If that has already
/// passed, the schedule keeps its phase and starts at the next future
/// occurrence `first + k * period`.
pub fn first_fire_delay(
    reminder_time: DateTime<Utc>,
    period: Duration,
    now: DateTime<Utc>,
) -> std::time::Duration {
    let mut first = reminder_time - Duration::minutes(REMINDER_LEAD_MINUTES);
    if first < now && period > Duration::zero() {
        let behind = (now - first).num_milliseconds();
        let step = period.num_milliseconds();
        let periods = (behind + step - 1) / step;
        first += Duration::milliseconds(periods * step);
    }
    (first - now).to_std().unwrap_or_default()
}

/// Owned scheduler; lives in `AppState` for the life of the process.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    jobs: DashMap<String, JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            jobs: DashMap::new(),
        }
    }

    fn habit_key(habit_id: &str) -> String {
        format!("habit:{}", habit_id)
    }

    fn event_key(event_id: &str) -> String {
        format!("event:{}", event_id)
    }

    /// Register (or replace) the recurring reminder for a habit.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_habit(&self, habit: &Habit, recipient: &str) {
        if habit.frequency == 0 {
            tracing::warn!(habit_id = %habit.id, "Habit has no frequency, reminder not scheduled");
            return;
        }

        let period = habit.frequency_window();
        let delay = first_fire_delay(habit.reminder_time, period, Utc::now());
        let period = std::time::Duration::from_secs(u64::from(habit.frequency) * 3600);

        let notifier = Arc::clone(&self.notifier);
        let reminder = Reminder::Habit {
            name: habit.name.clone(),
        };
        let recipient = recipient.to_string();
        let habit_id = habit.id.clone();

        tracing::info!(
            habit_id = %habit_id,
            first_in_secs = delay.as_secs(),
            every_hours = habit.frequency,
            "Scheduling habit reminder"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!(habit_id = %habit_id, "Habit reminder firing");
                notifier.send(&reminder, &recipient).await;
            }
        });

        self.register(Self::habit_key(&habit.id), handle);
    }

    /// Register a one-shot reminder at the event's `reminder_time`.
    ///
    /// Reminder times already in the past are ignored.
    pub fn schedule_event(&self, event: &Event) {
        let Ok(delay) = (event.reminder_time - Utc::now()).to_std() else {
            tracing::debug!(event_id = %event.id, "Event reminder time already passed");
            return;
        };

        let notifier = Arc::clone(&self.notifier);
        let reminder = Reminder::Event {
            name: event.name.clone(),
            date: event.date,
        };
        let recipient = event.email.clone();

        tracing::info!(event_id = %event.id, in_secs = delay.as_secs(), "Scheduling event reminder");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.send(&reminder, &recipient).await;
        });

        self.register(Self::event_key(&event.id), handle);
    }

    fn register(&self, key: String, handle: JoinHandle<()>) {
        self.jobs.retain(|_, job| !job.is_finished());
        if let Some(old) = self.jobs.insert(key.clone(), handle) {
            tracing::debug!(job = %key, "Replacing existing reminder job");
            old.abort();
        }
    }

    /// Stop the reminder for a habit. Returns whether one was registered.
    pub fn cancel_habit(&self, habit_id: &str) -> bool {
        match self.jobs.remove(&Self::habit_key(habit_id)) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_habit_scheduled(&self, habit_id: &str) -> bool {
        self.jobs
            .get(&Self::habit_key(habit_id))
            .is_some_and(|job| !job.is_finished())
    }

    /// Jobs still running.
    pub fn active_jobs(&self) -> usize {
        self.jobs.iter().filter(|job| !job.is_finished()).count()
    }

    /// Abort every job.
    pub fn shutdown(&self) {
        let count = self.jobs.len();
        self.jobs.retain(|_, job| {
            job.abort();
            false
        });
        tracing::info!(count, "Reminder scheduler stopped");
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for job in self.jobs.iter() {
            job.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_first_fire_is_ten_minutes_early() {
        let reminder_time = now() + Duration::hours(1);
        let delay = first_fire_delay(reminder_time, Duration::hours(2), now());
        assert_eq!(delay, std::time::Duration::from_secs(50 * 60));
    }

    #[test]
    fn test_past_first_fire_keeps_phase() {
        // First fire was 07:00; with a 2h period the next one is 09:00.
        let reminder_time = Utc.with_ymd_and_hms(2025, 3, 1, 7, 10, 0).unwrap();
        let delay = first_fire_delay(reminder_time, Duration::hours(2), now());
        assert_eq!(delay, std::time::Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_first_fire_exactly_now() {
        let reminder_time = now() + Duration::minutes(REMINDER_LEAD_MINUTES);
        let delay = first_fire_delay(reminder_time, Duration::hours(1), now());
        assert_eq!(delay, std::time::Duration::ZERO);
    }
}
