//! Order placement service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    domain::{
        addresses::AddressesService,
        carts::CartsService,
        inventory::InventoryLedger,
        orders::{OrdersService, records::OrderRecord},
        placement::{
            factory::OrderFactory,
            reconciler::CartReconciler,
            rejection::PlacementError,
            request::{CartCheckoutRequest, OrderRequest, SingleItemRequest},
            transaction::OrderTransaction,
        },
        products::ProductsService,
    },
};

#[derive(Clone)]
pub struct OrderPlacement {
    factory: OrderFactory,
    transaction: OrderTransaction,
}

impl OrderPlacement {
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductsService>,
        addresses: Arc<dyn AddressesService>,
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        ledger: Arc<dyn InventoryLedger>,
    ) -> Self {
        Self {
            factory: OrderFactory::new(products, addresses, carts.clone(), ledger.clone()),
            transaction: OrderTransaction::new(ledger, orders, CartReconciler::new(carts)),
        }
    }

    async fn place(
        &self,
        user: UserUuid,
        request: OrderRequest,
    ) -> Result<OrderRecord, PlacementError> {
        let draft = self.factory.build(user, &request).await?;

        Ok(self.transaction.execute(draft).await?)
    }
}

#[async_trait]
impl OrderPlacementService for OrderPlacement {
    async fn place_single_item_order(
        &self,
        user: UserUuid,
        request: SingleItemRequest,
    ) -> Result<OrderRecord, PlacementError> {
        self.place(user, OrderRequest::SingleItem(request)).await
    }

    async fn place_cart_order(
        &self,
        user: UserUuid,
        request: CartCheckoutRequest,
    ) -> Result<OrderRecord, PlacementError> {
        self.place(user, OrderRequest::Cart(request)).await
    }
}

#[automock]
#[async_trait]
pub trait OrderPlacementService: Send + Sync {
    /// Buy a single product directly.
    async fn place_single_item_order(
        &self,
        user: UserUuid,
        request: SingleItemRequest,
    ) -> Result<OrderRecord, PlacementError>;

    /// Buy the whole cart. One invalid line rejects the checkout.
    async fn place_cart_order(
        &self,
        user: UserUuid,
        request: CartCheckoutRequest,
    ) -> Result<OrderRecord, PlacementError>;
}
