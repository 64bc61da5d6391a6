//! Local file configuration store for development runs.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use ssosync_application::ConfigurationStore;
use ssosync_core::{AppError, AppResult};

/// Reads the assignment document from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileConfigurationStore {
    path: PathBuf,
}

impl FileConfigurationStore {
    /// Creates a store reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigurationStore for FileConfigurationStore {
    async fn load_document(&self) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => Ok(Some(document)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read configuration file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use ssosync_application::ConfigurationStore;

    use super::FileConfigurationStore;

    fn scratch_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap_or_else(|error| panic!("failed to create temp dir: {error}"))
    }

    #[tokio::test]
    async fn reads_existing_document() {
        let dir = scratch_dir();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "AdDomain": "corp.example" }"#)
            .await
            .unwrap_or_else(|error| panic!("failed to write fixture: {error}"));

        let document = FileConfigurationStore::new(path.clone())
            .load_document()
            .await
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(
            document.as_deref(),
            Some(r#"{ "AdDomain": "corp.example" }"#)
        );
    }

    #[tokio::test]
    async fn missing_file_is_absent_configuration() {
        let dir = scratch_dir();
        let document = FileConfigurationStore::new(dir.path().join("missing.json"))
            .load_document()
            .await
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(document, None);
    }
}
