//! YouTube Data API search client.

use crate::error::AppError;
use serde::Deserialize;

/// Results returned per search.
pub const MAX_RESULTS: u32 = 5;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Keyword search returning watch URLs.
#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl YoutubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Search videos by keyword; at most [`MAX_RESULTS`] links.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("YouTube search is not configured".to_string()))?;

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", &MAX_RESULTS.to_string()),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))?;

        tracing::debug!(query, count = results.items.len(), "YouTube search complete");
        Ok(video_links(results))
    }
}

/// Search list response (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Watch URLs for the video results.
pub fn video_links(response: SearchResponse) -> Vec<String> {
    response
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .take(MAX_RESULTS as usize)
        .map(|id| format!("https://www.youtube.com/watch?v={}", id))
        .collect()
}
