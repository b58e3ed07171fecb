//! Cart Records

use jiff::Timestamp;

use crate::{
    auth::UserUuid,
    domain::{
        products::records::ProductUuid,
        variants::{Color, Size},
    },
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// A user's cart. There is exactly one per user; an empty cart has no lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLineRecord>,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart Line Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub size: Size,
    pub color: Color,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLineRecord {
    #[must_use]
    pub fn key(&self) -> CartLineKey {
        CartLineKey {
            product_uuid: self.product_uuid,
            size: self.size,
            color: self.color,
        }
    }

    #[must_use]
    pub fn checked_out(&self) -> CheckedOutLine {
        CheckedOutLine {
            uuid: self.uuid,
            quantity: self.quantity,
        }
    }
}

/// A cart line as it was read when checkout started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedOutLine {
    pub uuid: CartLineUuid,
    pub quantity: u32,
}

/// Identifies a cart line by what was put in the cart rather than by its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartLineKey {
    pub product_uuid: ProductUuid,
    pub size: Size,
    pub color: Color,
}
