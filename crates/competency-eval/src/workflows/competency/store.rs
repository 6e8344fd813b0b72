use super::export::ExportArtifact;
use serde::Serialize;

/// Where finalized exports are kept until downloaded.
pub trait ArtifactStore: Send + Sync {
    fn put(&self, artifact: &ExportArtifact) -> Result<(), ArtifactStoreError>;
    fn fetch(&self, file_name: &str) -> Result<Option<ExportArtifact>, ArtifactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("'{0}' is not a valid export file name")]
    InvalidName(String),
    #[error("artifact store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Rejects names that could escape a storage directory.
pub fn validate_file_name(file_name: &str) -> Result<&str, ArtifactStoreError> {
    let invalid = file_name.trim().is_empty()
        || file_name.contains(['/', '\\'])
        || file_name.starts_with('.')
        || file_name.chars().any(char::is_control);
    if invalid {
        Err(ArtifactStoreError::InvalidName(file_name.to_string()))
    } else {
        Ok(file_name)
    }
}

/// Where a stored artifact can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLink {
    pub file_name: String,
    pub content_type: &'static str,
    pub size: usize,
    pub download_path: String,
}

impl ArtifactLink {
    pub fn for_artifact(artifact: &ExportArtifact) -> Self {
        Self {
            file_name: artifact.file_name.clone(),
            content_type: artifact.content_type,
            size: artifact.bytes.len(),
            download_path: format!(
                "/api/v1/exports/{}",
                urlencoding::encode(&artifact.file_name)
            ),
        }
    }
}
