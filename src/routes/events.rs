// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar event routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Event;
use crate::time_utils::parse_client_datetime;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(list_events).post(add_event))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub date: String,
    pub reminder_time: String,
    /// Reminder recipient
    #[validate(email)]
    pub email: String,
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Event>>> {
    let events = state.db.list_events(&user.user_id).await?;
    Ok(Json(events))
}

/// Store an event and schedule its one-shot reminder.
async fn add_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    req.validate()?;

    let date = parse_client_datetime(&req.date)
        .ok_or_else(|| AppError::Validation(format!("Invalid event date: {}", req.date)))?;
    let reminder_time = parse_client_datetime(&req.reminder_time).ok_or_else(|| {
        AppError::Validation(format!("Invalid reminder time: {}", req.reminder_time))
    })?;

    let event = Event {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        name: req.name,
        description: req.description,
        date,
        reminder_time,
        email: req.email,
    };
    state.db.set_event(&event).await?;
    state.scheduler.schedule_event(&event);

    tracing::info!(user_id = %user.user_id, event_id = %event.id, "Event added");
    Ok((StatusCode::CREATED, Json(event)))
}
