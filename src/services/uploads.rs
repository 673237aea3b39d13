//! Profile picture uploads.

use std::path::Path;

use crate::error::AppError;

/// Image extensions accepted for profile pictures.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Whether the filename carries an allowed image extension.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce a client filename to a safe basename.
///
/// Drops any directory part, maps whitespace to `_`, keeps only ASCII
/// alphanumerics and `.-_`, and strips leading dots and underscores.
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Write an uploaded picture under `upload_dir`.
///
/// The stored name is prefixed with the user ID so users cannot overwrite
/// each other's files. Returns the path relative to the static root.
pub async fn save_profile_picture(
    upload_dir: &Path,
    user_id: &str,
    filename: &str,
    data: &[u8],
) -> Result<String, AppError> {
    if !allowed_file(filename) {
        return Err(AppError::Validation(format!(
            "File type not allowed; use one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let safe = secure_filename(filename);
    if safe.is_empty() || !allowed_file(&safe) {
        return Err(AppError::Validation("Invalid file name".to_string()));
    }

    let stored = format!("{}_{}", secure_filename(user_id), safe);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {}", e)))?;
    tokio::fs::write(upload_dir.join(&stored), data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save upload: {}", e)))?;

    tracing::info!(user_id, file = %stored, bytes = data.len(), "Profile picture saved");
    Ok(format!("uploads/{}", stored))
}
