//! Inventory ledger.
//!
//! The ledger is the only authority on whether units can be taken from stock.
//! A reservation is a single check-and-decrement executed by the database, which
//! serialises concurrent reservations of the same product across every worker
//! and replica.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        inventory::{errors::InventoryLedgerError, repository::PgInventoryRepository},
        products::records::ProductUuid,
    },
};

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Units were taken from stock.
    Reserved { remaining: u32 },

    /// Not enough stock; nothing was changed.
    InsufficientStock { available: u32 },
}

#[derive(Debug, Clone)]
pub struct PgInventoryLedger {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryLedger {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryLedger for PgInventoryLedger {
    async fn reserve(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Reservation, InventoryLedgerError> {
        let mut conn = self.db.pool().acquire().await?;

        if let Some(remaining) = self.repository.reserve(&mut conn, product, quantity).await? {
            debug!(product_uuid = %product, quantity, remaining, "reserved inventory");

            return Ok(Reservation::Reserved { remaining });
        }

        let available = self
            .repository
            .available(&mut conn, product)
            .await?
            .unwrap_or(0);

        Ok(Reservation::InsufficientStock { available })
    }

    async fn release(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), InventoryLedgerError> {
        let mut conn = self.db.pool().acquire().await?;

        let remaining = self
            .repository
            .release(&mut conn, product, quantity)
            .await?
            .ok_or(InventoryLedgerError::ProductNotFound(product))?;

        debug!(product_uuid = %product, quantity, remaining, "released inventory");

        Ok(())
    }

    async fn available(&self, product: ProductUuid) -> Result<u32, InventoryLedgerError> {
        let mut conn = self.db.pool().acquire().await?;

        self.repository
            .available(&mut conn, product)
            .await?
            .ok_or(InventoryLedgerError::ProductNotFound(product))
    }
}

#[automock]
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Atomically take `quantity` units of a product if that many are available.
    ///
    /// An insufficient stock outcome carries the count observed by the failed
    /// check and leaves inventory untouched.
    async fn reserve(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Reservation, InventoryLedgerError>;

    /// Return `quantity` units of a product to stock.
    async fn release(&self, product: ProductUuid, quantity: u32)
    -> Result<(), InventoryLedgerError>;

    /// Units currently available. A non-mutating read.
    async fn available(&self, product: ProductUuid) -> Result<u32, InventoryLedgerError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::products::{ProductsService, data::NewProduct},
        test::TestContext,
    };

    use super::*;

    async fn stocked_product(ctx: &TestContext, inventory: u32) -> TestResult<ProductUuid> {
        let product = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                base_price: 1_000,
                compare_at_price: None,
                discount_percent: 0,
                inventory,
            })
            .await?;

        Ok(product.uuid)
    }

    #[tokio::test]
    async fn reserve_decrements_inventory() -> TestResult {
        let ctx = TestContext::new().await;
        let product = stocked_product(&ctx, 5).await?;

        let outcome = ctx.ledger.reserve(product, 3).await?;

        assert_eq!(outcome, Reservation::Reserved { remaining: 2 });
        assert_eq!(ctx.ledger.available(product).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_beyond_stock_reports_available_and_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let product = stocked_product(&ctx, 2).await?;

        let outcome = ctx.ledger.reserve(product, 3).await?;

        assert_eq!(outcome, Reservation::InsufficientStock { available: 2 });
        assert_eq!(ctx.ledger.available(product).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_unknown_product_reports_zero_available() -> TestResult {
        let ctx = TestContext::new().await;

        let outcome = ctx.ledger.reserve(ProductUuid::new(), 1).await?;

        assert_eq!(outcome, Reservation::InsufficientStock { available: 0 });

        Ok(())
    }

    #[tokio::test]
    async fn release_restores_inventory() -> TestResult {
        let ctx = TestContext::new().await;
        let product = stocked_product(&ctx, 4).await?;

        ctx.ledger.reserve(product, 4).await?;
        ctx.ledger.release(product, 4).await?;

        assert_eq!(ctx.ledger.available(product).await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn release_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        let result = ctx.ledger.release(product, 1).await;

        assert!(
            matches!(result, Err(InventoryLedgerError::ProductNotFound(uuid)) if uuid == product),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn concurrent_reservations_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;
        let product = stocked_product(&ctx, 3).await?;
        let ledger = Arc::new(ctx.ledger.clone());

        let attempts: Vec<_> = (0..12)
            .map(|_| {
                let ledger = Arc::clone(&ledger);

                tokio::spawn(async move { ledger.reserve(product, 1).await })
            })
            .collect();

        let mut reserved = 0;
        let mut refused = 0;

        for attempt in attempts {
            match attempt.await?? {
                Reservation::Reserved { .. } => reserved += 1,
                Reservation::InsufficientStock { available } => {
                    assert_eq!(available, 0, "refusals happen only once stock runs out");
                    refused += 1;
                }
            }
        }

        assert_eq!(reserved, 3);
        assert_eq!(refused, 9);
        assert_eq!(ledger.available(product).await?, 0);

        Ok(())
    }
}
