//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::{MockAuthService, UserUuid},
    context::AppContext,
    domain::{
        addresses::{MockAddressesService, records::AddressUuid},
        carts::MockCartsService,
        inventory::MockInventoryLedger,
        orders::{
            MockOrdersService, OrderStatus,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        placement::MockOrderPlacementService,
        products::{MockProductsService, records::ProductUuid},
        variants::{Color, Size},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_update_order_status().never();

    orders
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_line().never();
    carts.expect_remove_lines().never();
    carts.expect_remove_checked_out().never();

    carts
}

fn strict_placement_mock() -> MockOrderPlacementService {
    let mut placement = MockOrderPlacementService::new();

    placement.expect_place_single_item_order().never();
    placement.expect_place_cart_order().never();

    placement
}

/// Every collaborator is a mock that fails the test when called.
fn strict_app() -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        carts: Arc::new(strict_carts_mock()),
        orders: Arc::new(strict_orders_mock()),
        ledger: Arc::new(MockInventoryLedger::new()),
        placement: Arc::new(strict_placement_mock()),
        auth: Arc::new(strict_auth_mock()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(auth),
        ..strict_app()
    })
}

pub(crate) fn state_with_placement(placement: MockOrderPlacementService) -> Arc<State> {
    State::from_app_context(AppContext {
        placement: Arc::new(placement),
        ..strict_app()
    })
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        orders: Arc::new(orders),
        ..strict_app()
    })
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        ..strict_app()
    })
}

/// Serve `route` as the test user.
pub(crate) fn user_service(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn make_order(uuid: OrderUuid, product: ProductUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: TEST_USER_UUID,
        address_uuid: AddressUuid::new(),
        total_amount: 24_000,
        status: OrderStatus::Pending,
        customer_note: None,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            product_uuid: product,
            quantity: 3,
            unit_price: 8_000,
            size: Size::M,
            color: Color::Black,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
