// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration, password login, logout.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::SESSION_COOKIE;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use crate::routes::MessageResponse;
use crate::services::passwords::{hash_password, verify_password};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegisterResponse {
    pub user_id: String,
    pub message: String,
}

/// Create an account. Username and email must both be unused.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if state.db.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists!".to_string()));
    }
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists!".to_string()));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        username,
        email,
        password_hash: hash_password(&req.password)?,
        date_registered: Utc::now(),
    };
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            message: "Registration successful! Please log in.".to_string(),
        }),
    ))
}

// ─── Login / Logout ──────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

/// Verify the password and open a session (cookie plus returned token).
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let user = match state.db.find_user_by_email(&email).await? {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            tracing::info!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = create_jwt(&user.id, &user.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let mut cookie = session_cookie(&state, token.clone());
    cookie.set_max_age(time::Duration::days(30));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            message: format!("Welcome back, {}!", user.first_name),
        }),
    ))
}

/// Session cookie attributes; removal must repeat them to match.
fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .build()
}

/// Clear the session cookie. Bearer-token clients just drop their token.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(session_cookie(&state, String::new()));
    (jar, StatusCode::NO_CONTENT)
}

// ─── Password Reset ──────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Acknowledge a reset request for a known address.
///
/// No reset mail is sent yet; this only confirms the account exists.
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    match state.db.find_user_by_email(&email).await? {
        Some(_) => Ok(MessageResponse::new(format!(
            "A password reset link has been sent to {}.",
            email
        ))),
        None => Err(AppError::NotFound(
            "Email not found in our records.".to_string(),
        )),
    }
}
