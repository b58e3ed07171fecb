//! Products Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    columns::{
        amount_to_column, try_get_amount, try_get_count, try_get_optional_amount,
        try_get_optional_timestamp, try_get_timestamp,
    },
    products::{
        data::{NewProduct, ProductPricingUpdate},
        records::{ProductRecord, ProductUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_PRICING_SQL: &str = include_str!("sql/update_product_pricing.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(amount_to_column(product.base_price, "base_price")?)
            .bind(
                product
                    .compare_at_price
                    .map(|price| amount_to_column(price, "compare_at_price"))
                    .transpose()?,
            )
            .bind(i16::from(product.discount_percent))
            .bind(i64::from(product.inventory))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_pricing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductPricingUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_PRICING_SQL)
            .bind(product.into_uuid())
            .bind(amount_to_column(update.base_price, "base_price")?)
            .bind(
                update
                    .compare_at_price
                    .map(|price| amount_to_column(price, "compare_at_price"))
                    .transpose()?,
            )
            .bind(i16::from(update.discount_percent))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_percent: i16 = row.try_get("discount_percent")?;

        let discount_percent =
            u8::try_from(discount_percent).map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percent".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            base_price: try_get_amount(row, "base_price")?,
            compare_at_price: try_get_optional_amount(row, "compare_at_price")?,
            discount_percent,
            inventory: try_get_count(row, "inventory")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
            deleted_at: try_get_optional_timestamp(row, "deleted_at")?,
        })
    }
}
