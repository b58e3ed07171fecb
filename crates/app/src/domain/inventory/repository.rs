//! Inventory Repository
//!
//! Every statement here is a single conditional update on the product row, so
//! the row lock is held for exactly one statement.

use sqlx::{PgConnection, query_scalar};

use crate::domain::products::records::ProductUuid;

const RESERVE_INVENTORY_SQL: &str = include_str!("sql/reserve_inventory.sql");
const RELEASE_INVENTORY_SQL: &str = include_str!("sql/release_inventory.sql");
const GET_INVENTORY_SQL: &str = include_str!("sql/get_inventory.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Decrement inventory if at least `quantity` units remain.
    ///
    /// Returns the remaining inventory, or `None` when the floor check failed.
    pub(crate) async fn reserve(
        &self,
        conn: &mut PgConnection,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<u32>, sqlx::Error> {
        query_scalar::<_, i64>(RESERVE_INVENTORY_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(conn)
            .await?
            .map(to_count)
            .transpose()
    }

    /// Increment inventory. Returns `None` for an unknown product.
    pub(crate) async fn release(
        &self,
        conn: &mut PgConnection,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<u32>, sqlx::Error> {
        query_scalar::<_, i64>(RELEASE_INVENTORY_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(conn)
            .await?
            .map(to_count)
            .transpose()
    }

    pub(crate) async fn available(
        &self,
        conn: &mut PgConnection,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        query_scalar::<_, i64>(GET_INVENTORY_SQL)
            .bind(product.into_uuid())
            .fetch_optional(conn)
            .await?
            .map(to_count)
            .transpose()
    }
}

fn to_count(value: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: "inventory".to_string(),
        source: Box::new(e),
    })
}
