use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::CaptureError;
use crate::pipeline::types::ImageArtifact;

/// Produces a photo on demand. The real camera lives outside this crate;
/// the pipeline only needs something that yields an artifact.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(&self) -> Result<ImageArtifact, CaptureError>;
}

/// Capture source backed by a photo already on disk. Stands in for a camera
/// when wiring the pipeline from the command line and in tests.
pub struct FileCaptureSource {
    path: PathBuf,
}

impl FileCaptureSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CaptureSource for FileCaptureSource {
    async fn capture(&self) -> Result<ImageArtifact, CaptureError> {
        let metadata =
            tokio::fs::metadata(&self.path)
                .await
                .map_err(|source| CaptureError::Unreadable {
                    path: self.path.clone(),
                    source,
                })?;
        if !metadata.is_file() || metadata.len() == 0 {
            return Err(CaptureError::DeviceUnavailable(format!(
                "{} is not a usable photo",
                self.path.display()
            )));
        }
        Ok(ImageArtifact::jpeg(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn capture_from_an_existing_file() {
        let path = std::env::temp_dir().join(format!("fruitscan-{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&path, b"jpeg bytes").await.unwrap();

        let source = FileCaptureSource::new(path.clone());
        let artifact = source.capture().await.expect("Failed to capture");
        assert_eq!(artifact.path(), path);
        assert_eq!(artifact.mime_type(), "image/jpeg");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_a_capture_error() {
        let source = FileCaptureSource::new(PathBuf::from("/nonexistent/photo.jpg"));
        let error = source.capture().await.unwrap_err();
        assert!(matches!(error, CaptureError::Unreadable { .. }));
    }

    #[tokio::test]
    async fn empty_file_is_not_a_usable_photo() {
        let path = std::env::temp_dir().join(format!("fruitscan-{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&path, b"").await.unwrap();

        let source = FileCaptureSource::new(path.clone());
        let error = source.capture().await.unwrap_err();
        assert!(matches!(error, CaptureError::DeviceUnavailable(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
