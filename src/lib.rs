// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LifeHub: a personal productivity backend.
//!
//! This crate provides the JSON API for to-do items, habit tracking with
//! streaks and email reminders, calendar events, activity logging, user
//! profiles and a YouTube search passthrough.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{HabitService, ReminderScheduler, YoutubeClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub habits: HabitService,
    pub scheduler: Arc<ReminderScheduler>,
    pub youtube: YoutubeClient,
}
