// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise log routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::activity_log::{calories_burned, ActivityLog};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/activities", get(list_activities).post(log_activity))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivityRequest {
    /// Kilograms
    #[validate(range(exclusive_min = 0.0, max = 500.0))]
    pub weight: f64,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: String,
    /// Minutes
    #[validate(range(exclusive_min = 0.0, max = 1440.0))]
    pub duration: f64,
}

/// The caller's activity logs, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ActivityLog>>> {
    let logs = state.db.list_activity_logs(&user.user_id).await?;
    Ok(Json(logs))
}

async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<ActivityLog>)> {
    req.validate()?;

    let log = ActivityLog {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        weight: req.weight,
        calories_burned: calories_burned(&req.activity_type, req.weight, req.duration),
        activity_type: req.activity_type,
        duration: req.duration,
        timestamp: Utc::now(),
    };
    state.db.add_activity_log(&log).await?;

    tracing::info!(
        user_id = %user.user_id,
        calories = log.calories_burned,
        "Activity logged"
    );
    Ok((StatusCode::CREATED, Json(log)))
}
