// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LifeHub API Server
//!
//! Serves the to-do, habit, event, activity and profile API and runs the
//! habit/event email reminder jobs.

use lifehub::{
    config::Config,
    db::FirestoreDb,
    services::{HabitService, ReminderScheduler, SmtpNotifier, YoutubeClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting LifeHub API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Reminder mail and scheduler
    let notifier = SmtpNotifier::from_config(&config.smtp);
    let scheduler = Arc::new(ReminderScheduler::new(Arc::new(notifier)));

    let habits = HabitService::new(Arc::new(db.clone()), scheduler.clone());
    match habits.restore_reminders().await {
        Ok(count) => tracing::info!(count, "Reminder jobs registered"),
        Err(e) => tracing::warn!(error = %e, "Failed to restore habit reminders"),
    }

    let youtube = YoutubeClient::new(config.youtube_api_key.clone());
    if config.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set, search is disabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        habits,
        scheduler: scheduler.clone(),
        youtube,
    });

    // Build router
    let app = lifehub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lifehub=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
