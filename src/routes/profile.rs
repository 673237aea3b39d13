// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Profile;
use crate::services::uploads::save_profile_picture;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Largest accepted picture upload.
const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field carrying the picture.
const PICTURE_FIELD: &str = "profile_picture";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route(
            "/api/profile/picture",
            post(upload_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_BYTES)),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(max = 50))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub phone: String,
}

/// Stored profile, or a fresh placeholder saved on first view.
async fn load_or_create(state: &AppState, user: &AuthUser) -> Result<Profile> {
    if let Some(profile) = state.db.get_profile(&user.user_id).await? {
        return Ok(profile);
    }
    let profile = Profile::placeholder(&user.user_id);
    state.db.upsert_profile(&profile).await?;
    tracing::debug!(user_id = %user.user_id, "Created placeholder profile");
    Ok(profile)
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    load_or_create(&state, &user).await.map(Json)
}

/// Update text fields; the picture is kept.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>> {
    req.validate()?;
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username cannot be empty!".to_string()));
    }

    let mut profile = load_or_create(&state, &user).await?;
    profile.username = username.to_string();
    profile.address = req.address;
    profile.phone = req.phone;
    state.db.upsert_profile(&profile).await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(profile))
}

/// Replace the profile picture from a multipart upload.
async fn upload_picture(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<Profile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Upload has no file name".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;

        let path =
            save_profile_picture(&state.config.upload_dir, &user.user_id, &filename, &data).await?;

        let mut profile = load_or_create(&state, &user).await?;
        profile.profile_picture = path;
        state.db.upsert_profile(&profile).await?;
        return Ok(Json(profile));
    }

    Err(AppError::Validation(format!(
        "Missing '{}' file field",
        PICTURE_FIELD
    )))
}
