//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::{
    OrderStatus,
    data::{OrdersPage, OrdersQuery, Pagination},
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// One page of orders, newest first
    pub orders: Vec<OrderResponse>,

    pub pagination: PaginationResponse,
}

impl From<OrdersPage> for OrdersResponse {
    fn from(page: OrdersPage) -> Self {
        Self {
            orders: page.orders.into_iter().map(Into::into).collect(),
            pagination: page.pagination.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<Pagination> for PaginationResponse {
    fn from(pagination: Pagination) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total: pagination.total,
            total_pages: pagination.total_pages,
        }
    }
}

/// Order Index Handler
///
/// Returns the current user's order history. `status` narrows the list to one
/// lifecycle status; `ALL` or no value lists every order.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders listed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.index",
    skip(page, limit, status, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let status = OrderStatus::parse_filter(status.into_inner().as_deref())
        .or_400("could not parse \"status\" query parameter")?;

    let query = OrdersQuery::new(page.into_inner(), limit.into_inner(), status);

    let page = state
        .app
        .orders
        .list_orders(user, query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::{
            MockOrdersService,
            records::{OrderRecord, OrderUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order, state_with_orders, user_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        user_service(
            state_with_orders(orders),
            Router::with_path("orders").get(handler),
        )
    }

    fn page_of(query: &OrdersQuery, orders: Vec<OrderRecord>, total: u64) -> OrdersPage {
        OrdersPage {
            orders,
            pagination: Pagination::new(query, total),
        }
    }

    #[tokio::test]
    async fn test_index_defaults_to_first_page_of_ten() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user, query| *user == TEST_USER_UUID && *query == OrdersQuery::default())
            .return_once(|_, query| Ok(page_of(&query, vec![], 0)));

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert!(response.orders.is_empty());
        assert_eq!(response.pagination.page, 1);
        assert_eq!(response.pagination.limit, 10);
        assert_eq!(response.pagination.total_pages, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_page_limit_and_status() -> TestResult {
        let order = make_order(OrderUuid::new(), ProductUuid::new());

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, query| {
                *query == OrdersQuery::new(Some(2), Some(1), Some(OrderStatus::Pending))
            })
            .return_once(move |_, query| Ok(page_of(&query, vec![order], 3)));

        let response: OrdersResponse =
            TestClient::get("http://example.com/orders?page=2&limit=1&status=pending")
                .send(&make_service(orders))
                .await
                .take_json()
                .await?;

        assert_eq!(response.orders.len(), 1);
        assert_eq!(response.pagination.total, 3);
        assert_eq!(response.pagination.total_pages, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_all_status_lists_everything() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, query| query.status.is_none())
            .return_once(|_, query| Ok(page_of(&query, vec![], 0)));

        let res = TestClient::get("http://example.com/orders?status=ALL")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=LOST")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
