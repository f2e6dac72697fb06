use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

const DEFAULT_FILE_NAME: &str = "photo.jpg";

/// Reference to a captured photo on local storage. The pipeline never holds
/// the raw bytes, only the locator; the classification client reads the file
/// when it builds the upload.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    id: Uuid,
    path: PathBuf,
    mime_type: String,
    file_name: String,
    captured_at: DateTime<Utc>,
}

impl ImageArtifact {
    pub fn new(path: PathBuf, mime_type: impl Into<String>) -> Self {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        Self {
            id: Uuid::new_v4(),
            path,
            mime_type: mime_type.into(),
            file_name,
            captured_at: Utc::now(),
        }
    }

    pub fn jpeg(path: PathBuf) -> Self {
        Self::new(path, "image/jpeg")
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}
