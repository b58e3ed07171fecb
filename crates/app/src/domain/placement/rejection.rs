//! Placement outcomes other than success.

use thiserror::Error;

use crate::domain::{orders::records::OrderRecord, products::records::ProductUuid};

/// The request was invalid. Nothing was reserved or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderRejection {
    #[error("quantity must be an integer between 1 and 99")]
    InvalidQuantity,

    #[error("unknown size")]
    InvalidSize,

    #[error("unknown color")]
    InvalidColor,

    #[error("no shipping address on file")]
    NoShippingAddress,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart is empty")]
    EmptyCart,
}

/// The request was valid but could not be fulfilled. Any stock reserved for it
/// has been returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderFailure {
    #[error("only {available} units of product {product} are available")]
    InsufficientStock { product: ProductUuid, available: u32 },

    #[error("order could not be placed, please try again")]
    Infrastructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Rejected(#[from] OrderRejection),

    #[error(transparent)]
    Failed(#[from] OrderFailure),
}

/// Outcome of placing an order.
pub type OrderResult = Result<OrderRecord, PlacementError>;
