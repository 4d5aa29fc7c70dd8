//! Loads photos from disk for attachment.

use std::path::Path;

use posm_core::survey::{CaptureSource, ImageAttachment};
use posm_core::{Result, SurveyError};

/// Reads `path` into an attachment, guessing the content type from the
/// extension. Only `image/*` files are accepted, mirroring the browser's
/// `accept="image/*"` filter.
pub async fn load_image(path: &Path, source: CaptureSource) -> Result<ImageAttachment> {
    let content_type = mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(|| SurveyError::io(format!("Not an image file: {}", path.display())))?;

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageAttachment::new(
        file_name,
        content_type.essence_str(),
        bytes,
        source,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_jpeg() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shelf.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let image = load_image(&path, CaptureSource::Gallery).await.unwrap();

        assert_eq!(image.file_name, "shelf.jpg");
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.size(), 3);
        assert_eq!(image.source, CaptureSource::Gallery);
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(load_image(&path, CaptureSource::Camera).await.is_err());
    }
}
