//! Cart Checkout Handler

use std::{sync::Arc, time::Instant};

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::placement::CartCheckoutRequest;

use crate::{
    extensions::*,
    observability::{CheckoutMode, observe_placement},
    orders::{
        errors::{outcome_label, placement_status_error},
        get::OrderResponse,
    },
    state::State,
};

/// Checkout Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    pub customer_note: Option<String>,
}

impl From<CheckoutRequest> for CartCheckoutRequest {
    fn from(request: CheckoutRequest) -> Self {
        Self {
            customer_note: request.customer_note,
        }
    }
}

/// Cart Checkout Handler
///
/// Buys every line in the current user's cart as one order. A single invalid
/// or understocked line fails the whole checkout.
#[endpoint(
    tags("orders"),
    summary = "Checkout Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Order rejected"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let started = Instant::now();
    let result = state
        .app
        .placement
        .place_cart_order(user, json.into_inner().into())
        .await;

    observe_placement(CheckoutMode::Cart, outcome_label(&result), started.elapsed());

    let order = result.map_err(placement_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
