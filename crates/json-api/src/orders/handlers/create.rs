//! Place Order Handler

use std::{sync::Arc, time::Instant};

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use storefront_app::domain::placement::SingleItemRequest;

use crate::{
    extensions::*,
    observability::{CheckoutMode, observe_placement},
    orders::{
        errors::{outcome_label, placement_status_error},
        get::OrderResponse,
    },
    state::State,
};

/// Place Order Request
///
/// Buys a single product directly, leaving the rest of the cart alone.
/// Quantity, size and color accept any JSON value; a wrong type is reported
/// as the matching order rejection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub product_uuid: Uuid,

    /// Integer between 1 and 99
    #[serde(default)]
    #[salvo(schema(value_type = i64))]
    pub quantity: Value,

    /// Defaults to `M`
    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub size: Value,

    /// Defaults to `BLACK`
    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub color: Value,

    pub customer_note: Option<String>,
}

/// Absent or `null` variants take the default; anything else is handed on as
/// text and must name a known variant.
fn variant_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl From<PlaceOrderRequest> for SingleItemRequest {
    fn from(request: PlaceOrderRequest) -> Self {
        Self {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity.as_i64(),
            size: variant_text(request.size),
            color: variant_text(request.color),
            customer_note: request.customer_note,
        }
    }
}

/// Place Order Handler
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Order rejected"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(request.product_uuid));

    let started = Instant::now();
    let result = state
        .app
        .placement
        .place_single_item_order(user, request.into())
        .await;

    observe_placement(CheckoutMode::SingleItem, outcome_label(&result), started.elapsed());

    let order = result.map_err(placement_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::records::OrderUuid,
        placement::{MockOrderPlacementService, OrderFailure, OrderRejection},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order, state_with_placement, user_service};

    use super::*;

    fn make_service(placement: MockOrderPlacementService) -> Service {
        user_service(
            state_with_placement(placement),
            Router::with_path("orders").post(handler),
        )
    }

    #[tokio::test]
    async fn test_place_order_returns_201_with_location() -> TestResult {
        let uuid = OrderUuid::new();
        let product = ProductUuid::new();
        let order = make_order(uuid, product);

        let mut placement = MockOrderPlacementService::new();

        placement
            .expect_place_single_item_order()
            .once()
            .withf(move |user, request| {
                *user == TEST_USER_UUID
                    && request.product_uuid == product
                    && request.quantity == Some(3)
                    && request.size.as_deref() == Some("L")
                    && request.color.is_none()
            })
            .return_once(move |_, _| Ok(order));

        placement.expect_place_cart_order().never();

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3, "size": "L" }))
            .send(&make_service(placement))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(body.total_amount, 24_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_returns_422() -> TestResult {
        let mut placement = MockOrderPlacementService::new();

        placement
            .expect_place_single_item_order()
            .once()
            .return_once(|_, _| Err(OrderRejection::NoShippingAddress.into()));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_409() -> TestResult {
        let product = ProductUuid::new();

        let mut placement = MockOrderPlacementService::new();

        placement
            .expect_place_single_item_order()
            .once()
            .return_once(move |_, _| {
                Err(OrderFailure::InsufficientStock {
                    product,
                    available: 2,
                }
                .into())
            });

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_infrastructure_failure_returns_500() -> TestResult {
        let mut placement = MockOrderPlacementService::new();

        placement
            .expect_place_single_item_order()
            .once()
            .return_once(|_, _| Err(OrderFailure::Infrastructure.into()));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    fn rejecting_placement(
        expected: impl Fn(&SingleItemRequest) -> bool + Send + 'static,
        rejection: OrderRejection,
    ) -> MockOrderPlacementService {
        let mut placement = MockOrderPlacementService::new();

        placement
            .expect_place_single_item_order()
            .once()
            .withf(move |_, request| expected(request))
            .return_once(move |_, _| Err(rejection.into()));

        placement
    }

    #[tokio::test]
    async fn test_non_integer_quantities_are_invalid_quantity() -> TestResult {
        for quantity in [json!(2.5), json!("3"), json!(1e20), json!(null)] {
            let placement = rejecting_placement(
                |request| request.quantity.is_none(),
                OrderRejection::InvalidQuantity,
            );

            let mut res = TestClient::post("http://example.com/orders")
                .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": quantity }))
                .send(&make_service(placement))
                .await;

            let body = res.take_string().await?;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNPROCESSABLE_ENTITY),
                "{quantity}: {body}"
            );
            assert!(
                body.contains(&OrderRejection::InvalidQuantity.to_string()),
                "{quantity}: {body}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_quantity_is_invalid_quantity() -> TestResult {
        let placement = rejecting_placement(
            |request| request.quantity.is_none(),
            OrderRejection::InvalidQuantity,
        );

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": Uuid::now_v7() }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_string_size_reaches_size_validation() -> TestResult {
        let placement = rejecting_placement(
            |request| request.size.as_deref() == Some("42") && request.color.is_none(),
            OrderRejection::InvalidSize,
        );

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1, "size": 42, "color": null }))
            .send(&make_service(placement))
            .await;

        let body = res.take_string().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(body.contains(&OrderRejection::InvalidSize.to_string()), "{body}");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_string_color_reaches_color_validation() -> TestResult {
        let placement = rejecting_placement(
            |request| request.color.as_deref() == Some("true"),
            OrderRejection::InvalidColor,
        );

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1, "color": true }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_product_returns_400() -> TestResult {
        let mut placement = MockOrderPlacementService::new();

        placement.expect_place_single_item_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(placement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
