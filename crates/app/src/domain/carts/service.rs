//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::carts::{
        data::NewCartLine,
        errors::CartsServiceError,
        records::{Cart, CartLineKey, CartLineRecord, CheckedOutLine},
        repository::PgCartLinesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartLinesRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self.repository.get_cart_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart {
            user_uuid: user,
            lines,
        })
    }

    async fn add_line(
        &self,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError> {
        if !(1..=99).contains(&line.quantity) {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let line = self
            .repository
            .upsert_cart_line(&mut tx, user, line)
            .await?
            .ok_or(CartsServiceError::UnknownProduct)?;

        tx.commit().await?;

        Ok(line)
    }

    async fn remove_lines(
        &self,
        user: UserUuid,
        keys: Vec<CartLineKey>,
    ) -> Result<u64, CartsServiceError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;

        let removed = self
            .repository
            .delete_cart_lines(&mut tx, user, &keys)
            .await?;

        tx.commit().await?;

        debug!(user_uuid = %user, removed, "removed cart lines");

        Ok(removed)
    }

    async fn remove_checked_out(
        &self,
        user: UserUuid,
        lines: Vec<CheckedOutLine>,
    ) -> Result<u64, CartsServiceError> {
        if lines.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;

        let reconciled = self
            .repository
            .remove_checked_out_lines(&mut tx, user, &lines)
            .await?;

        tx.commit().await?;

        debug!(user_uuid = %user, reconciled, "removed checked out cart lines");

        Ok(reconciled)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart. Users without lines get an empty cart.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a line to the cart, merging quantities with an existing line for the
    /// same product, size and color. Merged quantities are capped at 99.
    async fn add_line(
        &self,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Remove every line matching one of `keys`, returning how many were removed.
    async fn remove_lines(
        &self,
        user: UserUuid,
        keys: Vec<CartLineKey>,
    ) -> Result<u64, CartsServiceError>;

    /// Take checked out quantities off the lines they were read from. A line
    /// merged into since checkout keeps the extra units; every other line is
    /// removed. Returns how many lines were touched.
    async fn remove_checked_out(
        &self,
        user: UserUuid,
        lines: Vec<CheckedOutLine>,
    ) -> Result<u64, CartsServiceError>;
}
