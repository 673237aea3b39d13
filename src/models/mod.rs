// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity_log;
pub mod event;
pub mod habit;
pub mod todo;
pub mod user;

pub use activity_log::ActivityLog;
pub use event::Event;
pub use habit::{Habit, HabitActivity};
pub use todo::{Priority, Todo, TodoFilter};
pub use user::{Profile, User};
