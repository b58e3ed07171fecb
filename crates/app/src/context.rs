//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        inventory::{InventoryLedger, PgInventoryLedger},
        orders::{OrdersService, PgOrdersService},
        placement::{OrderPlacement, OrderPlacementService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub addresses: Arc<dyn AddressesService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub ledger: Arc<dyn InventoryLedger>,
    pub placement: Arc<dyn OrderPlacementService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, lock_timeout: Duration) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::with_lock_timeout(pool.clone(), lock_timeout);

        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let addresses: Arc<dyn AddressesService> = Arc::new(PgAddressesService::new(db.clone()));
        let carts: Arc<dyn CartsService> = Arc::new(PgCartsService::new(db.clone()));
        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(db.clone()));
        let ledger: Arc<dyn InventoryLedger> = Arc::new(PgInventoryLedger::new(db));

        let placement = Arc::new(OrderPlacement::new(
            products.clone(),
            addresses.clone(),
            carts.clone(),
            orders.clone(),
            ledger.clone(),
        ));

        Ok(Self {
            products,
            addresses,
            carts,
            orders,
            ledger,
            placement,
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
