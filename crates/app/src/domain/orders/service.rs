//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        inventory::repository::PgInventoryRepository,
        orders::{
            data::{NewOrder, OrdersPage, OrdersQuery, Pagination},
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
            status::OrderStatus,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    inventory: PgInventoryRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items = self.repository.get_order_items(tx, &uuids).await?;

        for order in orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user_uuid = %user,
            order_uuid = %order.uuid,
            item_count = order.items.len(),
            total_amount = order.total_amount
        ),
        err
    )]
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let mut created = self
            .repository
            .create_order(
                &mut tx,
                user,
                order.uuid,
                order.address_uuid,
                order.total_amount,
                order.customer_note,
            )
            .await?;

        for (position, item) in order.items.into_iter().enumerate() {
            let item = self
                .repository
                .create_order_item(&mut tx, created.uuid, position, item)
                .await?;

            created.items.push(item);
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = vec![self.repository.get_order(&mut tx, user, order).await?];

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<OrdersPage, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let total = self
            .repository
            .count_orders(&mut tx, user, query.status)
            .await?;

        let mut orders = self.repository.list_orders(&mut tx, user, &query).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(OrdersPage {
            orders,
            pagination: Pagination::new(&query, total),
        })
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip_all,
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let mut updated = vec![
            self.repository
                .update_order_status(&mut tx, order, status)
                .await?,
        ];

        self.attach_items(&mut tx, &mut updated).await?;

        if status == OrderStatus::Cancelled {
            for item in updated.iter().flat_map(|order| &order.items) {
                let restocked = self
                    .inventory
                    .release(&mut tx, item.product_uuid, item.quantity)
                    .await?;

                if restocked.is_none() {
                    warn!(
                        order_uuid = %order,
                        product_uuid = %item.product_uuid,
                        "cancelled item refers to a missing product"
                    );
                }
            }
        }

        tx.commit().await?;

        debug!(order_uuid = %order, from = %current.status, to = %status, "order status updated");

        updated.pop().ok_or(OrdersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persist an order and all of its items in one transaction. Items keep the
    /// order they are given in.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// A single order belonging to `user`.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// One page of the user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<OrdersPage, OrdersServiceError>;

    /// Move an order along its lifecycle. Cancelling returns every item's
    /// quantity to stock in the same transaction.
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
