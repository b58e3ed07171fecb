//! Cart Reconciler

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    auth::UserUuid,
    domain::{carts::CartsService, placement::draft::Purchased},
};

/// Removes purchased lines from a cart after the order exists. Failures are
/// logged and swallowed: a stale cart line never undoes a placed order.
#[derive(Clone)]
pub struct CartReconciler {
    carts: Arc<dyn CartsService>,
}

impl CartReconciler {
    #[must_use]
    pub fn new(carts: Arc<dyn CartsService>) -> Self {
        Self { carts }
    }

    pub async fn remove_purchased(&self, user: UserUuid, purchased: Purchased) {
        let (mode, requested, result) = match purchased {
            Purchased::Variants(keys) => {
                let requested = keys.len();

                ("variants", requested, self.carts.remove_lines(user, keys).await)
            }
            Purchased::CartLines(lines) => {
                let requested = lines.len();

                ("cart_lines", requested, self.carts.remove_checked_out(user, lines).await)
            }
        };

        match result {
            Ok(removed) => debug!(user_uuid = %user, mode, requested, removed, "reconciled cart"),
            Err(source) => {
                warn!(user_uuid = %user, mode, requested, "failed to reconcile cart: {source}");
            }
        }
    }
}
