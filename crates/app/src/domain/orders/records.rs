//! Order Records

use jiff::Timestamp;

use crate::{
    auth::UserUuid,
    domain::{
        addresses::records::AddressUuid,
        orders::status::OrderStatus,
        products::records::ProductUuid,
        variants::{Color, Size},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// `total_amount` is fixed when the order is created and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub address_uuid: AddressUuid,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub customer_note: Option<String>,
    /// In the order they were requested.
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    /// Effective unit price at the moment of purchase.
    pub unit_price: u64,
    pub size: Size,
    pub color: Color,
}
