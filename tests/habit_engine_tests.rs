// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Confirmation and streak rules through `HabitService`.
//!
//! All tests pass an explicit `now`, so they do not depend on the wall clock
//! except for reminder registration.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use lifehub::db::{HabitStore, MemoryHabitStore};
use lifehub::error::{AppError, Result};
use lifehub::models::Habit;
use lifehub::services::{HabitInput, HabitService, ReminderScheduler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

mod common;
use common::{test_habits, test_user, RecordingNotifier};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn input(name: &str, frequency: u32) -> HabitInput {
    HabitInput {
        name: name.to_string(),
        description: "Daily practice".to_string(),
        frequency,
        reminder_time: Utc::now() + Duration::hours(6),
    }
}

/// Memory store that counts whole-document writes.
#[derive(Default)]
struct CountingStore {
    inner: MemoryHabitStore,
    updates: AtomicUsize,
}

#[async_trait]
impl HabitStore for CountingStore {
    async fn create(&self, habit: &Habit) -> Result<()> {
        self.inner.create(habit).await
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Habit>> {
        self.inner.find_by_owner(user_id).await
    }

    async fn find_by_id(&self, habit_id: &str) -> Result<Option<Habit>> {
        self.inner.find_by_id(habit_id).await
    }

    async fn update(&self, habit: &Habit) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(habit).await
    }

    async fn delete(&self, habit_id: &str) -> Result<bool> {
        self.inner.delete(habit_id).await
    }

    async fn list_all(&self) -> Result<Vec<Habit>> {
        self.inner.list_all().await
    }
}

/// Memory store that can hold one read open after taking its snapshot.
#[derive(Default)]
struct PausingStore {
    inner: MemoryHabitStore,
    hold_owner_read: AtomicBool,
    hold_id_read: AtomicBool,
    held: Notify,
    release: Notify,
}

impl PausingStore {
    async fn hold_if_armed(&self, flag: &AtomicBool) {
        if flag.swap(false, Ordering::SeqCst) {
            self.held.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl HabitStore for PausingStore {
    async fn create(&self, habit: &Habit) -> Result<()> {
        self.inner.create(habit).await
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Habit>> {
        let habits = self.inner.find_by_owner(user_id).await?;
        self.hold_if_armed(&self.hold_owner_read).await;
        Ok(habits)
    }

    async fn find_by_id(&self, habit_id: &str) -> Result<Option<Habit>> {
        let habit = self.inner.find_by_id(habit_id).await?;
        self.hold_if_armed(&self.hold_id_read).await;
        Ok(habit)
    }

    async fn update(&self, habit: &Habit) -> Result<()> {
        self.inner.update(habit).await
    }

    async fn delete(&self, habit_id: &str) -> Result<bool> {
        self.inner.delete(habit_id).await
    }

    async fn list_all(&self) -> Result<Vec<Habit>> {
        self.inner.list_all().await
    }
}

fn pausing_service() -> (Arc<HabitService>, Arc<PausingStore>) {
    let store = Arc::new(PausingStore::default());
    let scheduler = Arc::new(ReminderScheduler::new(Arc::new(RecordingNotifier::default())));
    (Arc::new(HabitService::new(store.clone(), scheduler)), store)
}

#[tokio::test]
async fn test_first_confirmation_is_accepted() {
    let habits = test_habits();
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Read", 24)).await.unwrap();
    assert!(habit.last_confirmed.is_none());

    let confirmed = habits
        .service
        .confirm_habit(&user, &habit.id, t0())
        .await
        .unwrap();

    assert_eq!(confirmed.last_confirmed, Some(t0()));
    assert_eq!(confirmed.today_count, 1);
    assert_eq!(confirmed.confirmation_count.get("2025-03-01"), Some(&1));
}

#[tokio::test]
async fn test_hourly_habit_scenario() {
    let habits = test_habits();
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Water", 1)).await.unwrap();

    habits
        .service
        .confirm_habit(&user, &habit.id, t0())
        .await
        .unwrap();

    let err = habits
        .service
        .confirm_habit(&user, &habit.id, t0() + Duration::minutes(30))
        .await
        .unwrap_err();
    match err {
        AppError::TooSoon {
            frequency_hours,
            retry_after_secs,
        } => {
            assert_eq!(frequency_hours, 1);
            assert_eq!(retry_after_secs, 30 * 60);
        }
        other => panic!("expected TooSoon, got {:?}", other),
    }

    let confirmed = habits
        .service
        .confirm_habit(&user, &habit.id, t0() + Duration::minutes(61))
        .await
        .unwrap();
    assert_eq!(confirmed.today_count, 2);
    assert_eq!(confirmed.last_confirmed, Some(t0() + Duration::minutes(61)));
}

#[tokio::test]
async fn test_rejection_leaves_habit_untouched() {
    let habits = test_habits();
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Yoga", 8)).await.unwrap();

    let first = habits
        .service
        .confirm_habit(&user, &habit.id, t0())
        .await
        .unwrap();
    let result = habits
        .service
        .confirm_habit(&user, &habit.id, t0() + Duration::hours(7))
        .await;
    assert!(matches!(result, Err(AppError::TooSoon { .. })));

    let stored = habits.service.get_habit(&user, &habit.id).await.unwrap();
    assert_eq!(stored, first);
}

#[tokio::test]
async fn test_gap_at_least_frequency_accepts_both() {
    let habits = test_habits();
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Walk", 2)).await.unwrap();

    habits
        .service
        .confirm_habit(&user, &habit.id, t0())
        .await
        .unwrap();
    // Exactly one window later is allowed.
    let confirmed = habits
        .service
        .confirm_habit(&user, &habit.id, t0() + Duration::hours(2))
        .await
        .unwrap();

    assert_eq!(confirmed.today_count, 2);
    assert_eq!(confirmed.confirmation_count.get("2025-03-01"), Some(&2));
}

#[tokio::test]
async fn test_one_write_per_accepted_confirmation() {
    let store = Arc::new(CountingStore::default());
    let scheduler = Arc::new(ReminderScheduler::new(Arc::new(RecordingNotifier::default())));
    let service = HabitService::new(store.clone(), scheduler);
    let user = test_user("u1");
    let habit = service.add_habit(&user, input("Plank", 4)).await.unwrap();

    service.confirm_habit(&user, &habit.id, t0()).await.unwrap();
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);

    let _ = service
        .confirm_habit(&user, &habit.id, t0() + Duration::hours(1))
        .await;
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_confirmations_accept_one() {
    let habits = Arc::new(test_habits());
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Pushups", 24)).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let habits = habits.clone();
            let user = user.clone();
            let id = habit.id.clone();
            tokio::spawn(async move { habits.service.confirm_habit(&user, &id, t0()).await })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);

    let stored = habits.service.get_habit(&user, &habit.id).await.unwrap();
    assert_eq!(stored.today_count, 1);
}

#[tokio::test]
async fn test_confirmation_during_list_is_kept() {
    let (service, store) = pausing_service();
    let user = test_user("u1");
    let habit = service.add_habit(&user, input("Water", 1)).await.unwrap();

    // The list takes its snapshot, then stalls while a confirmation lands.
    store.hold_owner_read.store(true, Ordering::SeqCst);
    let lister = tokio::spawn({
        let service = service.clone();
        let user = user.clone();
        async move { service.list_habits(&user, t0() + Duration::minutes(1)).await }
    });
    store.held.notified().await;

    service.confirm_habit(&user, &habit.id, t0()).await.unwrap();
    store.release.notify_one();

    let listed = lister.await.unwrap().unwrap();
    assert_eq!(listed[0].last_confirmed, Some(t0()));
    assert_eq!(listed[0].streak, 1);

    let stored = service.get_habit(&user, &habit.id).await.unwrap();
    assert_eq!(stored.last_confirmed, Some(t0()));
    assert_eq!(stored.today_count, 1);
    assert_eq!(stored.streak, 1);

    let again = service
        .confirm_habit(&user, &habit.id, t0() + Duration::minutes(5))
        .await;
    assert!(matches!(again, Err(AppError::TooSoon { .. })));
}

#[tokio::test]
async fn test_confirmation_during_update_is_kept() {
    let (service, store) = pausing_service();
    let user = test_user("u1");
    let habit = service.add_habit(&user, input("Stretch", 1)).await.unwrap();

    // The update's first read stalls while a confirmation lands.
    store.hold_id_read.store(true, Ordering::SeqCst);
    let updater = tokio::spawn({
        let service = service.clone();
        let user = user.clone();
        let id = habit.id.clone();
        async move { service.update_habit(&user, &id, input("Stretch more", 2)).await }
    });
    store.held.notified().await;

    service.confirm_habit(&user, &habit.id, t0()).await.unwrap();
    store.release.notify_one();

    let updated = updater.await.unwrap().unwrap();
    assert_eq!(updated.name, "Stretch more");
    assert_eq!(updated.frequency, 2);

    let stored = service.get_habit(&user, &habit.id).await.unwrap();
    assert_eq!(stored.name, "Stretch more");
    assert_eq!(stored.last_confirmed, Some(t0()));
    assert_eq!(stored.today_count, 1);
}

#[tokio::test]
async fn test_recompute_without_confirmation_keeps_streak() {
    let habits = test_habits();
    let user = test_user("u1");
    let mut habit = habits.service.add_habit(&user, input("Sketch", 24)).await.unwrap();

    habits
        .service
        .recompute_streak(&mut habit, t0())
        .await
        .unwrap();

    assert_eq!(habit.streak, 0);
    assert_eq!(habit.last_updated, Some(t0()));
    let stored = habits.service.get_habit(&user, &habit.id).await.unwrap();
    assert_eq!(stored.last_updated, Some(t0()));
}

#[tokio::test]
async fn test_streak_counts_days_not_views() {
    let habits = test_habits();
    let user = test_user("u1");
    let habit = habits.service.add_habit(&user, input("Piano", 12)).await.unwrap();

    habits
        .service
        .confirm_habit(&user, &habit.id, t0())
        .await
        .unwrap();
    for minutes in [0, 5, 60] {
        let listed = habits
            .service
            .list_habits(&user, t0() + Duration::minutes(minutes))
            .await
            .unwrap();
        assert_eq!(listed[0].streak, 1);
    }

    // Next day, no confirmation yet: unchanged.
    let next_day = t0() + Duration::days(1);
    let listed = habits.service.list_habits(&user, next_day).await.unwrap();
    assert_eq!(listed[0].streak, 1);

    habits
        .service
        .confirm_habit(&user, &habit.id, next_day)
        .await
        .unwrap();
    let listed = habits.service.list_habits(&user, next_day).await.unwrap();
    assert_eq!(listed[0].streak, 2);
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let habits = test_habits();
    let user = test_user("u1");
    let created = habits
        .service
        .add_habit(&user, input("Language practice", 24))
        .await
        .unwrap();

    let fetched = habits.service.get_habit(&user, &created.id).await.unwrap();
    assert_eq!(fetched.name, "Language practice");
    assert_eq!(fetched.description, "Daily practice");
    assert_eq!(fetched.frequency, 24);
    assert_eq!(fetched.streak, 0);
    assert_eq!(fetched.reminder_email.as_deref(), Some("u1@example.com"));
}

#[tokio::test]
async fn test_missing_and_foreign_habits_are_not_found() {
    let habits = test_habits();
    let owner = test_user("owner");
    let other = test_user("other");
    let habit = habits.service.add_habit(&owner, input("Run", 24)).await.unwrap();

    let err = habits
        .service
        .confirm_habit(&owner, "no-such-habit", t0())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = habits
        .service
        .confirm_habit(&other, &habit.id, t0())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = habits
        .service
        .remove_habit(&other, &habit.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(habits.store.len(), 1);
}

#[tokio::test]
async fn test_blank_fields_rejected() {
    let habits = test_habits();
    let user = test_user("u1");
    let mut form = input("   ", 24);

    let err = habits.service.add_habit(&user, form.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Please fill out all fields."));

    form.name = "Cook".to_string();
    form.frequency = 0;
    let err = habits.service.add_habit(&user, form).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(habits.store.is_empty());
}

#[tokio::test]
async fn test_restore_reminders_registers_stored_habits() {
    let habits = test_habits();
    let user = test_user("u1");
    let a = habits.service.add_habit(&user, input("A", 24)).await.unwrap();
    let b = habits.service.add_habit(&user, input("B", 12)).await.unwrap();

    // Simulate a restart: fresh scheduler over the same store.
    let scheduler = Arc::new(ReminderScheduler::new(Arc::new(RecordingNotifier::default())));
    let service = HabitService::new(habits.store.clone(), scheduler.clone());

    assert_eq!(service.restore_reminders().await.unwrap(), 2);
    assert!(scheduler.is_habit_scheduled(&a.id));
    assert!(scheduler.is_habit_scheduled(&b.id));
}
