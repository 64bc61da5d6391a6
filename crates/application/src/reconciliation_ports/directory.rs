use async_trait::async_trait;

use ssosync_core::AppResult;

use super::Page;

/// Group as listed by the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    /// Identity store group identifier.
    pub group_id: String,
    /// Raw display name including the directory domain suffix.
    pub display_name: Option<String>,
}

/// Port for querying groups of the configured identity store.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Lists one page of groups.
    async fn list_groups(&self, next_token: Option<String>) -> AppResult<Page<DirectoryGroup>>;
}
