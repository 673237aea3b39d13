// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise log model and calorie estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logged exercise session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    /// Body weight in kilograms
    pub weight: f64,
    /// "running", "cycling", or anything else (treated as light exercise)
    pub activity_type: String,
    /// Duration in minutes
    pub duration: f64,
    pub calories_burned: f64,
    pub timestamp: DateTime<Utc>,
}

/// MET value for an activity type.
fn met(activity_type: &str) -> f64 {
    match activity_type {
        "running" => 10.0,
        "cycling" => 7.5,
        _ => 3.8,
    }
}

/// Estimated calories burned, rounded to two decimals.
pub fn calories_burned(activity_type: &str, weight: f64, duration: f64) -> f64 {
    let calories = met(activity_type) * weight * duration / 60.0;
    (calories * 100.0).round() / 100.0
}
