//! Order Transaction
//!
//! Reserves every line, persists the order and reconciles the cart as one
//! all-or-nothing step. Stock is reserved line by line through the ledger and
//! handed back if a later line or the order insert fails, so no lock spans more
//! than a single statement or the order insert itself.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{error, info, warn};

use crate::domain::{
    inventory::{InventoryLedger, Reservation},
    orders::{
        OrdersService,
        records::{OrderRecord, OrderUuid},
    },
    placement::{
        draft::{DraftLine, OrderDraft},
        reconciler::CartReconciler,
        rejection::OrderFailure,
    },
    products::records::ProductUuid,
};

/// Stock taken so far by one transaction.
type Reserved = SmallVec<[(ProductUuid, u32); 8]>;

#[derive(Clone)]
pub struct OrderTransaction {
    ledger: Arc<dyn InventoryLedger>,
    orders: Arc<dyn OrdersService>,
    reconciler: CartReconciler,
}

impl OrderTransaction {
    #[must_use]
    pub fn new(
        ledger: Arc<dyn InventoryLedger>,
        orders: Arc<dyn OrdersService>,
        reconciler: CartReconciler,
    ) -> Self {
        Self {
            ledger,
            orders,
            reconciler,
        }
    }

    /// Place the order described by `draft`.
    ///
    /// The work runs on its own task: dropping the returned future (a client
    /// disconnect or request timeout) does not stop it between reserving and
    /// compensating.
    ///
    /// # Errors
    ///
    /// [`OrderFailure::InsufficientStock`] when a line cannot be reserved and
    /// [`OrderFailure::Infrastructure`] when the ledger or storage fails. Either
    /// way no stock remains reserved.
    pub async fn execute(&self, draft: OrderDraft) -> Result<OrderRecord, OrderFailure> {
        let transaction = self.clone();

        tokio::spawn(async move { transaction.run(draft).await })
            .await
            .map_err(|source| {
                error!("order transaction task failed: {source}");

                OrderFailure::Infrastructure
            })?
    }

    async fn run(&self, draft: OrderDraft) -> Result<OrderRecord, OrderFailure> {
        let user = draft.user_uuid;

        let Some(total_amount) = draft.total_amount() else {
            error!(user_uuid = %user, "order total overflows");

            return Err(OrderFailure::Infrastructure);
        };

        let reserved = self.reserve_all(&draft.lines).await?;

        let purchased = draft.purchased();
        let new_order = draft.into_new_order(OrderUuid::new(), total_amount);
        let order_uuid = new_order.uuid;

        let order = match self.orders.create_order(user, new_order).await {
            Ok(order) => order,
            Err(source) => {
                error!(user_uuid = %user, order_uuid = %order_uuid, "failed to persist order: {source}");

                self.release_all(&reserved).await;

                return Err(OrderFailure::Infrastructure);
            }
        };

        info!(
            user_uuid = %user,
            order_uuid = %order.uuid,
            total_amount = order.total_amount,
            items = order.items.len(),
            "placed order"
        );

        self.reconciler.remove_purchased(user, purchased).await;

        Ok(order)
    }

    async fn reserve_all(&self, lines: &[DraftLine]) -> Result<Reserved, OrderFailure> {
        let mut reserved = Reserved::new();

        for line in lines {
            let failure = match self.ledger.reserve(line.product_uuid, line.quantity).await {
                Ok(Reservation::Reserved { .. }) => {
                    reserved.push((line.product_uuid, line.quantity));

                    continue;
                }
                Ok(Reservation::InsufficientStock { available }) => {
                    info!(
                        product_uuid = %line.product_uuid,
                        requested = line.quantity,
                        available,
                        "insufficient stock"
                    );

                    OrderFailure::InsufficientStock {
                        product: line.product_uuid,
                        available,
                    }
                }
                Err(source) => {
                    error!(product_uuid = %line.product_uuid, "failed to reserve inventory: {source}");

                    OrderFailure::Infrastructure
                }
            };

            self.release_all(&reserved).await;

            return Err(failure);
        }

        Ok(reserved)
    }

    /// Hand back reservations in reverse order of taking them.
    async fn release_all(&self, reserved: &[(ProductUuid, u32)]) {
        for &(product, quantity) in reserved.iter().rev() {
            if let Err(source) = self.ledger.release(product, quantity).await {
                warn!(
                    product_uuid = %product,
                    quantity,
                    "failed to release reserved inventory: {source}"
                );
            }
        }
    }
}
