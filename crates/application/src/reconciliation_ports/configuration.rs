use async_trait::async_trait;

use ssosync_core::AppResult;

/// Port for reading the stored assignment configuration document.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Returns the raw JSON document, or `None` when nothing is stored.
    async fn load_document(&self) -> AppResult<Option<String>>;
}
