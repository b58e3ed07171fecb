//! Inventory ledger errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum InventoryLedgerError {
    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("storage error")]
    Sql(#[from] Error),
}
