//! Cart Data

use crate::domain::{
    carts::records::CartLineUuid,
    products::records::ProductUuid,
    variants::{Color, Size},
};

/// New Cart Line Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub size: Size,
    pub color: Color,
}
