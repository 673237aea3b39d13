// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! To-do list routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Priority, Todo, TodoFilter};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/todos", get(list_todos).post(add_todo))
        .route(
            "/api/todos/{id}",
            get(view_todo).put(update_todo).delete(delete_todo),
        )
}

#[derive(Debug, Deserialize)]
pub struct TodoListParams {
    #[serde(default)]
    pub filter: TodoFilter,
}

/// Fields of the to-do form.
#[derive(Debug, Deserialize, Validate)]
pub struct TodoRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
}

/// The caller's todos, newest first.
async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<TodoListParams>,
) -> Result<Json<Vec<Todo>>> {
    let todos = state.db.list_todos(&user.user_id, params.filter).await?;
    Ok(Json(todos))
}

async fn add_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<TodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    req.validate()?;

    let todo = Todo {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        name: req.name,
        description: req.description,
        completed: req.completed,
        due_date: req.due_date,
        priority: req.priority,
        date_created: Utc::now(),
    };
    state.db.set_todo(&todo).await?;

    tracing::info!(user_id = %user.user_id, todo_id = %todo.id, "Todo added");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Load a todo, hiding other users' items.
async fn owned_todo(state: &AppState, user: &AuthUser, todo_id: &str) -> Result<Todo> {
    state
        .db
        .get_todo(todo_id)
        .await?
        .filter(|t| t.user_id == user.user_id)
        .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))
}

async fn view_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(todo_id): Path<String>,
) -> Result<Json<Todo>> {
    owned_todo(&state, &user, &todo_id).await.map(Json)
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(todo_id): Path<String>,
    Json(req): Json<TodoRequest>,
) -> Result<Json<Todo>> {
    req.validate()?;

    let mut todo = owned_todo(&state, &user, &todo_id).await?;
    todo.name = req.name;
    todo.description = req.description;
    todo.completed = req.completed;
    todo.due_date = req.due_date;
    todo.priority = req.priority;
    state.db.set_todo(&todo).await?;

    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(todo_id): Path<String>,
) -> Result<StatusCode> {
    owned_todo(&state, &user, &todo_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::NotFound("Task not found or access denied.".to_string()),
        other => other,
    })?;
    state.db.delete_todo(&todo_id).await?;

    tracing::info!(user_id = %user.user_id, todo_id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
