/// Saving the compressed result to disk

use rfd::FileDialog;
use std::path::PathBuf;
use tracing::info;

use crate::error::SaveError;
use crate::state::Payload;

/// Show the native save dialog pre-filled with `file_name`.
/// Returns `None` when the user cancels.
pub fn choose_destination(file_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save compressed image")
        .set_file_name(file_name)
        .save_file()
}

/// Write `payload` to `path`, returning the path on success
pub async fn save_file(path: PathBuf, payload: Payload) -> Result<PathBuf, SaveError> {
    tokio::fs::write(&path, &payload)
        .await
        .map_err(|e| SaveError::io(&path, e))?;

    info!(path = %path.display(), bytes = payload.len(), "saved compressed image");
    Ok(path)
}
