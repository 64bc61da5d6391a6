use async_trait::async_trait;
use aws_config::SdkConfig;
use ssosync_application::{DirectoryGroup, DirectoryService, Page};
use ssosync_core::AppResult;

use crate::aws_sdk_config::{next_token, upstream_error};

/// Identity Store implementation of the directory port.
#[derive(Clone)]
pub struct AwsIdentityStoreDirectory {
    client: aws_sdk_identitystore::Client,
    identity_store_id: String,
}

impl AwsIdentityStoreDirectory {
    /// Creates a directory bound to one identity store.
    #[must_use]
    pub fn new(config: &SdkConfig, identity_store_id: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_identitystore::Client::new(config),
            identity_store_id: identity_store_id.into(),
        }
    }
}

#[async_trait]
impl DirectoryService for AwsIdentityStoreDirectory {
    async fn list_groups(&self, next: Option<String>) -> AppResult<Page<DirectoryGroup>> {
        let output = self
            .client
            .list_groups()
            .identity_store_id(self.identity_store_id.as_str())
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("identitystore:ListGroups", error))?;

        Ok(Page {
            items: output
                .groups()
                .iter()
                .map(|group| DirectoryGroup {
                    group_id: group.group_id().to_owned(),
                    display_name: group.display_name().map(str::to_owned),
                })
                .collect(),
            next_token: next_token(output.next_token()),
        })
    }
}
