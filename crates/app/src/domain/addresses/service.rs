//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::addresses::{
        data::NewAddress, errors::AddressesServiceError, records::AddressRecord,
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn default_address(
        &self,
        user: UserUuid,
    ) -> Result<Option<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_default_address(&mut tx, user).await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        if address.is_default {
            self.repository.clear_default_address(&mut tx, user).await?;
        }

        let created = self
            .repository
            .create_address(&mut tx, user, address)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// The address orders ship to: the user's default, falling back to their
    /// oldest address. `None` when the user has no addresses.
    async fn default_address(
        &self,
        user: UserUuid,
    ) -> Result<Option<AddressRecord>, AddressesServiceError>;

    /// Saves a shipping address for the user.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::addresses::records::AddressUuid, test::TestContext};

    use super::*;

    fn new_address(recipient: &str, is_default: bool) -> NewAddress {
        NewAddress {
            uuid: AddressUuid::new(),
            recipient: recipient.to_string(),
            line_1: "1 High Street".to_string(),
            line_2: None,
            city: "Leeds".to_string(),
            postcode: "LS1 1AA".to_string(),
            country: "GB".to_string(),
            phone: None,
            is_default,
        }
    }

    #[tokio::test]
    async fn default_address_is_none_without_addresses() -> TestResult {
        let ctx = TestContext::new().await;

        let address = ctx.addresses.default_address(UserUuid::new()).await?;

        assert!(address.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn default_address_prefers_flagged_address() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.addresses
            .create_address(user, new_address("Older", false))
            .await?;

        let flagged = ctx
            .addresses
            .create_address(user, new_address("Flagged", true))
            .await?;

        let address = ctx.addresses.default_address(user).await?;

        assert_eq!(address.map(|a| a.uuid), Some(flagged.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn default_address_falls_back_to_oldest() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let oldest = ctx
            .addresses
            .create_address(user, new_address("First", false))
            .await?;

        ctx.addresses
            .create_address(user, new_address("Second", false))
            .await?;

        let address = ctx.addresses.default_address(user).await?;

        assert_eq!(address.map(|a| a.uuid), Some(oldest.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn new_default_replaces_previous_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.addresses
            .create_address(user, new_address("Old default", true))
            .await?;

        let replacement = ctx
            .addresses
            .create_address(user, new_address("New default", true))
            .await?;

        let address = ctx.addresses.default_address(user).await?;

        assert_eq!(address.map(|a| a.uuid), Some(replacement.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn addresses_are_scoped_to_their_user() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.addresses
            .create_address(UserUuid::new(), new_address("Someone else", true))
            .await?;

        let address = ctx.addresses.default_address(UserUuid::new()).await?;

        assert!(address.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn blank_recipient_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .addresses
            .create_address(UserUuid::new(), new_address("   ", false))
            .await;

        assert!(matches!(result, Err(AddressesServiceError::InvalidData)));

        Ok(())
    }
}
