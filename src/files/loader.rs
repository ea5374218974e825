/// Reading picked and dropped files into memory

use rfd::FileDialog;
use std::path::PathBuf;
use tracing::debug;

use super::media;
use crate::error::LoadError;
use crate::state::Payload;

/// A file read from disk, not yet accepted into the session
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// File name including extension
    pub name: String,
    pub media_type: Option<&'static str>,
    pub payload: Payload,
}

impl LoadedFile {
    pub fn is_image(&self) -> bool {
        self.media_type.is_some_and(media::is_image_media_type)
    }
}

/// Show the native open dialog, restricted to image types.
/// Returns `None` when the user cancels.
pub fn pick_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select an image to compress")
        .add_filter("Images", media::IMAGE_EXTENSIONS)
        .pick_file()
}

/// Read `path` fully into memory
pub async fn load_file(path: PathBuf) -> Result<LoadedFile, LoadError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| LoadError::io(&path, e))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = media::declared_media_type(&path);

    debug!(name = %name, bytes = bytes.len(), media_type = ?media_type, "loaded file");

    Ok(LoadedFile {
        name,
        media_type,
        payload: Payload::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let loaded = load_file(path).await.unwrap();
        assert_eq!(loaded.name, "photo.jpg");
        assert_eq!(loaded.media_type, Some("image/jpeg"));
        assert!(loaded.is_image());
        assert_eq!(loaded.payload.len(), 4);
    }

    #[tokio::test]
    async fn test_load_non_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let loaded = load_file(path).await.unwrap();
        assert!(!loaded.is_image());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");

        let err = load_file(path.clone()).await.unwrap_err();
        let LoadError::Io { path: reported, .. } = err;
        assert_eq!(reported, path);
    }
}
