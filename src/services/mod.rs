// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod habits;
pub mod notifier;
pub mod passwords;
pub mod scheduler;
pub mod uploads;
pub mod youtube;

pub use habits::{HabitInput, HabitService};
pub use notifier::{Notifier, Reminder, SmtpNotifier};
pub use scheduler::ReminderScheduler;
pub use youtube::YoutubeClient;
