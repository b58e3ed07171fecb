//! Cart Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        carts::{
            data::NewCartLine,
            records::{CartLineKey, CartLineRecord, CartLineUuid, CheckedOutLine},
        },
        columns::{try_get_quantity, try_get_timestamp},
        products::records::ProductUuid,
        variants::decode_variant,
    },
};

const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("sql/upsert_cart_line.sql");
const DELETE_CART_LINES_SQL: &str = include_str!("sql/delete_cart_lines.sql");
const LOCK_CART_LINES_SQL: &str = include_str!("sql/lock_cart_lines.sql");
const REMOVE_CHECKED_OUT_LINES_SQL: &str = include_str!("sql/remove_checked_out_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Returns `None` when the product does not exist or has been deleted.
    pub(crate) async fn upsert_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        let quantity = i32::try_from(line.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, CartLineRecord>(UPSERT_CART_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(quantity)
            .bind(line.size.as_str())
            .bind(line.color.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        keys: &[CartLineKey],
    ) -> Result<u64, sqlx::Error> {
        let products: Vec<Uuid> = keys.iter().map(|k| k.product_uuid.into_uuid()).collect();
        let sizes: Vec<&str> = keys.iter().map(|k| k.size.as_str()).collect();
        let colors: Vec<&str> = keys.iter().map(|k| k.color.as_str()).collect();

        let rows_affected = query(DELETE_CART_LINES_SQL)
            .bind(user.into_uuid())
            .bind(products)
            .bind(sizes)
            .bind(colors)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Takes each checked out quantity off its line, deleting lines that would
    /// be left empty. Returns how many lines were reduced or deleted.
    pub(crate) async fn remove_checked_out_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        lines: &[CheckedOutLine],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = lines.iter().map(|line| line.uuid.into_uuid()).collect();
        let quantities = lines
            .iter()
            .map(|line| i32::try_from(line.quantity))
            .collect::<Result<Vec<i32>, _>>()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        // Held until commit, so the quantity comparison sees every merge.
        query(LOCK_CART_LINES_SQL)
            .bind(user.into_uuid())
            .bind(uuids.as_slice())
            .execute(&mut **tx)
            .await?;

        let reconciled: i64 = query_scalar(REMOVE_CHECKED_OUT_LINES_SQL)
            .bind(user.into_uuid())
            .bind(uuids)
            .bind(quantities)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(reconciled).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            size: decode_variant(row, "size")?,
            color: decode_variant(row, "color")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
