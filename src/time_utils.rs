// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format used by HTML `datetime-local` inputs.
const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar-day key (`YYYY-MM-DD`) used for per-day confirmation counts.
pub fn date_key(date: DateTime<Utc>) -> String {
    date.date_naive().format("%Y-%m-%d").to_string()
}

/// Parse a client-supplied timestamp.
///
/// Accepts RFC3339 or the `datetime-local` form (`2025-03-01T08:30`),
/// the latter interpreted as UTC.
pub fn parse_client_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, FORM_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
