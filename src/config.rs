//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::path::PathBuf;

/// Default outbound mail relay (implicit TLS).
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "lifehub_token";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Directory where profile pictures are written
    pub upload_dir: PathBuf,
    /// Outbound reminder mail settings
    pub smtp: SmtpConfig,
    /// YouTube Data API key (search is disabled without it)
    pub youtube_api_key: Option<String>,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

/// SMTP relay and sender credentials.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
}

impl SmtpConfig {
    /// Both halves of the credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.sender_email.is_some() && self.sender_password.is_some()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static/uploads")),
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
                port: match env::var("SMTP_PORT") {
                    Ok(raw) => raw
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::Invalid("SMTP_PORT"))?,
                    Err(_) => DEFAULT_SMTP_PORT,
                },
                sender_email: optional_var("SENDER_EMAIL"),
                sender_password: optional_var("SENDER_PASSWORD"),
            },
            youtube_api_key: optional_var("YOUTUBE_API_KEY"),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Config for tests. Never touches the environment.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            upload_dir: env::temp_dir().join("lifehub-test-uploads"),
            smtp: SmtpConfig {
                host: DEFAULT_SMTP_HOST.to_string(),
                port: DEFAULT_SMTP_PORT,
                sender_email: None,
                sender_password: None,
            },
            youtube_api_key: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        !(self.frontend_url.starts_with("http://localhost")
            || self.frontend_url.starts_with("http://127.0.0.1"))
    }
}

/// Non-empty, trimmed environment variable.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("SENDER_EMAIL", "  reminders@example.com ");
        env::remove_var("SMTP_PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.smtp.port, DEFAULT_SMTP_PORT);
        assert_eq!(
            config.smtp.sender_email.as_deref(),
            Some("reminders@example.com")
        );
    }

    #[test]
    fn test_secure_cookies_off_for_localhost() {
        let mut config = Config::test_default();
        assert!(!config.secure_cookies());

        config.frontend_url = "https://lifehub.example.com".to_string();
        assert!(config.secure_cookies());
    }
}
