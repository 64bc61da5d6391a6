use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_organizations::types::{self as sdk, ChildType};
use ssosync_application::{AccountStatus, OrganizationAccount, OrganizationService, Page};
use ssosync_core::AppResult;
use ssosync_domain::OrganizationalUnit;

use crate::aws_sdk_config::{next_token, upstream_error};

/// AWS Organizations implementation of the organization port.
#[derive(Clone)]
pub struct AwsOrganizationsService {
    client: aws_sdk_organizations::Client,
}

impl AwsOrganizationsService {
    /// Creates an organization service from the shared SDK configuration.
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_organizations::Client::new(config),
        }
    }
}

fn account_status(status: Option<&sdk::AccountStatus>) -> AccountStatus {
    match status {
        Some(sdk::AccountStatus::Active) => AccountStatus::Active,
        Some(sdk::AccountStatus::Suspended) => AccountStatus::Suspended,
        Some(sdk::AccountStatus::PendingClosure) => AccountStatus::PendingClosure,
        _ => AccountStatus::Unknown,
    }
}

fn organization_account(account: &sdk::Account) -> OrganizationAccount {
    OrganizationAccount {
        id: account.id().map(str::to_owned),
        name: account.name().map(str::to_owned),
        status: account_status(account.status()),
    }
}

fn organizational_unit(unit: &sdk::OrganizationalUnit) -> Option<OrganizationalUnit> {
    Some(OrganizationalUnit::new(unit.id()?, unit.name()?))
}

#[async_trait]
impl OrganizationService for AwsOrganizationsService {
    async fn list_roots(&self, next: Option<String>) -> AppResult<Page<String>> {
        let output = self
            .client
            .list_roots()
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("organizations:ListRoots", error))?;

        Ok(Page {
            items: output
                .roots()
                .iter()
                .filter_map(|root| root.id().map(str::to_owned))
                .collect(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn list_child_unit_ids(
        &self,
        parent_id: &str,
        next: Option<String>,
    ) -> AppResult<Page<String>> {
        let output = self
            .client
            .list_children()
            .parent_id(parent_id)
            .child_type(ChildType::OrganizationalUnit)
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("organizations:ListChildren", error))?;

        Ok(Page {
            items: output
                .children()
                .iter()
                .filter_map(|child| child.id().map(str::to_owned))
                .collect(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn describe_organizational_unit(
        &self,
        unit_id: &str,
    ) -> AppResult<Option<OrganizationalUnit>> {
        match self
            .client
            .describe_organizational_unit()
            .organizational_unit_id(unit_id)
            .send()
            .await
        {
            Ok(output) => Ok(output.organizational_unit().and_then(organizational_unit)),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_organizational_unit_not_found_exception() {
                    Ok(None)
                } else {
                    Err(upstream_error(
                        "organizations:DescribeOrganizationalUnit",
                        service_error,
                    ))
                }
            }
        }
    }

    async fn list_units_for_parent(
        &self,
        parent_id: &str,
        next: Option<String>,
    ) -> AppResult<Page<OrganizationalUnit>> {
        let output = self
            .client
            .list_organizational_units_for_parent()
            .parent_id(parent_id)
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| {
                upstream_error("organizations:ListOrganizationalUnitsForParent", error)
            })?;

        Ok(Page {
            items: output
                .organizational_units()
                .iter()
                .filter_map(organizational_unit)
                .collect(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn list_accounts_for_parent(
        &self,
        parent_id: &str,
        next: Option<String>,
    ) -> AppResult<Page<OrganizationAccount>> {
        let output = self
            .client
            .list_accounts_for_parent()
            .parent_id(parent_id)
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("organizations:ListAccountsForParent", error))?;

        Ok(Page {
            items: output.accounts().iter().map(organization_account).collect(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn list_accounts(&self, next: Option<String>) -> AppResult<Page<OrganizationAccount>> {
        let output = self
            .client
            .list_accounts()
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("organizations:ListAccounts", error))?;

        Ok(Page {
            items: output.accounts().iter().map(organization_account).collect(),
            next_token: next_token(output.next_token()),
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_organizations::types as sdk;
    use ssosync_application::AccountStatus;

    use super::{organization_account, organizational_unit};

    #[test]
    fn account_status_maps_to_port_status() {
        let suspended = sdk::Account::builder()
            .id("444")
            .name("closed")
            .status(sdk::AccountStatus::Suspended)
            .build();
        let unlabelled = sdk::Account::builder().id("555").build();

        let suspended = organization_account(&suspended);
        let unlabelled = organization_account(&unlabelled);

        assert_eq!(suspended.status, AccountStatus::Suspended);
        assert_eq!(suspended.into_active_account(), None);
        assert_eq!(unlabelled.status, AccountStatus::Unknown);
        assert_eq!(unlabelled.name, None);
    }

    #[test]
    fn active_account_converts_to_domain_account() {
        let account = sdk::Account::builder()
            .id("111")
            .name("prod-a")
            .status(sdk::AccountStatus::Active)
            .build();

        let account = organization_account(&account)
            .into_active_account()
            .unwrap_or_else(|| panic!("account should be active"));

        assert_eq!(account.id, "111");
        assert_eq!(account.name, "prod-a");
    }

    #[test]
    fn units_without_a_name_are_ignored() {
        let named = sdk::OrganizationalUnit::builder()
            .id("ou-prod")
            .name("Prod")
            .build();
        let unnamed = sdk::OrganizationalUnit::builder().id("ou-x").build();

        assert_eq!(
            organizational_unit(&named).map(|unit| unit.name),
            Some("Prod".to_owned())
        );
        assert_eq!(organizational_unit(&unnamed), None);
    }
}
