//! Order Factory
//!
//! Validates a request and prices it. Checks run in a fixed order so callers
//! always see the same rejection for the same input: quantity, size, color,
//! shipping address, product, then (for cart checkout) an empty cart. The
//! stock check at the end is advisory; the ledger decides when reserving.

use std::{str::FromStr, sync::Arc};

use rustc_hash::FxHashMap;
use tracing::error;

use crate::{
    auth::UserUuid,
    domain::{
        addresses::{AddressesService, records::AddressRecord},
        carts::{
            CartsService,
            records::{CartLineRecord, CheckedOutLine},
        },
        inventory::{InventoryLedger, InventoryLedgerError},
        placement::{
            draft::{DraftLine, DraftSource, OrderDraft},
            rejection::{OrderFailure, OrderRejection, PlacementError},
            request::{OrderRequest, SingleItemRequest},
        },
        products::{
            ProductsService, ProductsServiceError, pricing::effective_unit_price,
            records::ProductUuid,
        },
        variants::{Color, Size},
    },
};

const QUANTITY_RANGE: std::ops::RangeInclusive<i64> = 1..=99;

/// A line that passed the request-only checks and still needs a price.
struct CheckedLine {
    product_uuid: ProductUuid,
    quantity: u32,
    size: Size,
    color: Color,
}

#[derive(Clone)]
pub struct OrderFactory {
    products: Arc<dyn ProductsService>,
    addresses: Arc<dyn AddressesService>,
    carts: Arc<dyn CartsService>,
    ledger: Arc<dyn InventoryLedger>,
}

impl OrderFactory {
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductsService>,
        addresses: Arc<dyn AddressesService>,
        carts: Arc<dyn CartsService>,
        ledger: Arc<dyn InventoryLedger>,
    ) -> Self {
        Self {
            products,
            addresses,
            carts,
            ledger,
        }
    }

    /// Validate and price `request` for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Rejected`] for invalid requests and
    /// [`PlacementError::Failed`] when the advisory stock check already fails or
    /// a collaborator is unavailable.
    pub async fn build(
        &self,
        user: UserUuid,
        request: &OrderRequest,
    ) -> Result<OrderDraft, PlacementError> {
        let (source, checked) = match request {
            OrderRequest::SingleItem(single) => {
                (DraftSource::SingleItem, vec![check_single_item(single)?])
            }
            OrderRequest::Cart(_) => {
                let (checked, checked_out) = self.check_cart(user).await?;

                (DraftSource::Cart(checked_out), checked)
            }
        };

        let address = self.shipping_address(user).await?;

        let mut lines = Vec::with_capacity(checked.len());

        for line in checked {
            let unit_price = self.unit_price(line.product_uuid).await?;

            lines.push(DraftLine {
                product_uuid: line.product_uuid,
                quantity: line.quantity,
                unit_price,
                size: line.size,
                color: line.color,
            });
        }

        if lines.is_empty() {
            return Err(OrderRejection::EmptyCart.into());
        }

        self.check_stock(&lines).await?;

        Ok(OrderDraft {
            user_uuid: user,
            address_uuid: address.uuid,
            source,
            lines,
            customer_note: request.customer_note(),
        })
    }

    /// Check every cart line, keeping a snapshot of each for reconciliation.
    async fn check_cart(
        &self,
        user: UserUuid,
    ) -> Result<(Vec<CheckedLine>, Vec<CheckedOutLine>), PlacementError> {
        let cart = self.carts.get_cart(user).await.map_err(|source| {
            error!(user_uuid = %user, "failed to load cart: {source}");

            OrderFailure::Infrastructure
        })?;

        let checked = cart
            .lines
            .iter()
            .map(check_cart_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((checked, cart.lines.iter().map(CartLineRecord::checked_out).collect()))
    }

    async fn shipping_address(&self, user: UserUuid) -> Result<AddressRecord, PlacementError> {
        self.addresses
            .default_address(user)
            .await
            .map_err(|source| {
                error!(user_uuid = %user, "failed to load shipping address: {source}");

                OrderFailure::Infrastructure
            })?
            .ok_or_else(|| OrderRejection::NoShippingAddress.into())
    }

    async fn unit_price(&self, product: ProductUuid) -> Result<u64, PlacementError> {
        match self.products.get_product(product).await {
            Ok(record) => Ok(effective_unit_price(&record)),
            Err(ProductsServiceError::NotFound) => Err(OrderRejection::ProductNotFound.into()),
            Err(source) => {
                error!(product_uuid = %product, "failed to load product: {source}");

                Err(OrderFailure::Infrastructure.into())
            }
        }
    }

    /// Compare the total requested per product against what the ledger holds.
    async fn check_stock(&self, lines: &[DraftLine]) -> Result<(), PlacementError> {
        let mut requested: Vec<(ProductUuid, u64)> = Vec::new();
        let mut index: FxHashMap<ProductUuid, usize> = FxHashMap::default();

        for line in lines {
            let slot = *index.entry(line.product_uuid).or_insert_with(|| {
                requested.push((line.product_uuid, 0));
                requested.len() - 1
            });

            if let Some((_, total)) = requested.get_mut(slot) {
                *total += u64::from(line.quantity);
            }
        }

        for (product, quantity) in requested {
            let available = match self.ledger.available(product).await {
                Ok(available) => available,
                Err(InventoryLedgerError::ProductNotFound(_)) => {
                    return Err(OrderRejection::ProductNotFound.into());
                }
                Err(source) => {
                    error!(product_uuid = %product, "failed to read inventory: {source}");

                    return Err(OrderFailure::Infrastructure.into());
                }
            };

            if quantity > u64::from(available) {
                return Err(OrderFailure::InsufficientStock { product, available }.into());
            }
        }

        Ok(())
    }
}

fn check_single_item(request: &SingleItemRequest) -> Result<CheckedLine, OrderRejection> {
    let quantity = check_quantity(request.quantity)?;
    let size = parse_or_default(request.size.as_deref(), OrderRejection::InvalidSize)?;
    let color = parse_or_default(request.color.as_deref(), OrderRejection::InvalidColor)?;

    Ok(CheckedLine {
        product_uuid: request.product_uuid,
        quantity,
        size,
        color,
    })
}

fn check_cart_line(line: &CartLineRecord) -> Result<CheckedLine, PlacementError> {
    let quantity = check_quantity(Some(i64::from(line.quantity)))?;

    Ok(CheckedLine {
        product_uuid: line.product_uuid,
        quantity,
        size: line.size,
        color: line.color,
    })
}

fn check_quantity(quantity: Option<i64>) -> Result<u32, OrderRejection> {
    let Some(quantity) = quantity.filter(|quantity| QUANTITY_RANGE.contains(quantity)) else {
        return Err(OrderRejection::InvalidQuantity);
    };

    u32::try_from(quantity).map_err(|_ignored| OrderRejection::InvalidQuantity)
}

/// Absent values take the variant's default; present ones must parse.
fn parse_or_default<V>(raw: Option<&str>, rejection: OrderRejection) -> Result<V, OrderRejection>
where
    V: FromStr + Default,
{
    raw.map_or_else(|| Ok(V::default()), |value| value.parse().map_err(|_ignored| rejection))
}
