// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit routes: CRUD, confirmation and activity.
//!
//! Handlers only translate JSON; the rules live in [`crate::services::habits`].

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Habit;
use crate::services::HabitInput;
use crate::time_utils::{format_utc_rfc3339, parse_client_datetime};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest accepted confirmation interval (one year).
const MAX_FREQUENCY_HOURS: u32 = 24 * 366;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/habits", get(list_habits).post(add_habit))
        .route("/api/habits/{id}", put(update_habit).delete(remove_habit))
        .route("/api/habits/{id}/confirm", post(confirm_habit))
        .route("/api/habits/{id}/activity", get(view_activity))
}

/// Add/edit form.
#[derive(Debug, Deserialize, Validate)]
pub struct HabitRequest {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    /// Hours between confirmations
    #[validate(range(min = 1, max = MAX_FREQUENCY_HOURS))]
    pub frequency: u32,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM` (UTC)
    pub reminder_time: String,
}

impl TryFrom<HabitRequest> for HabitInput {
    type Error = AppError;

    fn try_from(req: HabitRequest) -> Result<Self> {
        req.validate()?;
        let reminder_time = parse_client_datetime(&req.reminder_time).ok_or_else(|| {
            AppError::Validation(format!("Invalid reminder time: {}", req.reminder_time))
        })?;
        Ok(HabitInput {
            name: req.name,
            description: req.description,
            frequency: req.frequency,
            reminder_time,
        })
    }
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub habit: Habit,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    pub habit_id: String,
    pub name: String,
    /// RFC 3339 timestamp, or "not confirmed yet"
    pub last_confirmed: String,
    pub today_count: u32,
}

async fn list_habits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Habit>>> {
    let habits = state.habits.list_habits(&user, Utc::now()).await?;
    Ok(Json(habits))
}

async fn add_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<HabitRequest>,
) -> Result<(StatusCode, Json<Habit>)> {
    let habit = state.habits.add_habit(&user, req.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

async fn update_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(habit_id): Path<String>,
    Json(req): Json<HabitRequest>,
) -> Result<Json<Habit>> {
    let habit = state
        .habits
        .update_habit(&user, &habit_id, req.try_into()?)
        .await?;
    Ok(Json(habit))
}

async fn remove_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(habit_id): Path<String>,
) -> Result<StatusCode> {
    state.habits.remove_habit(&user, &habit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirm a habit; 409 `too_soon` inside the frequency window.
async fn confirm_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(habit_id): Path<String>,
) -> Result<Json<ConfirmResponse>> {
    let habit = state
        .habits
        .confirm_habit(&user, &habit_id, Utc::now())
        .await?;
    Ok(Json(ConfirmResponse {
        message: "Habit confirmed successfully!".to_string(),
        habit,
    }))
}

async fn view_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(habit_id): Path<String>,
) -> Result<Json<ActivityResponse>> {
    let activity = state.habits.view_activity(&user, &habit_id).await?;
    Ok(Json(ActivityResponse {
        habit_id: activity.habit_id,
        name: activity.name,
        last_confirmed: activity
            .last_confirmed
            .map(format_utc_rfc3339)
            .unwrap_or_else(|| "not confirmed yet".to_string()),
        today_count: activity.today_count,
    }))
}
