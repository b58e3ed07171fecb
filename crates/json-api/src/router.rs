//! App Router

use salvo::Router;

use crate::{auth, carts, orders};

/// Routes that act on behalf of the authenticated shopper.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("checkout").post(orders::checkout::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("lines").post(carts::lines::handler)),
        )
}
