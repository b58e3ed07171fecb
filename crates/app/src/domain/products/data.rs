//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub base_price: u64,
    pub compare_at_price: Option<u64>,
    pub discount_percent: u8,
    pub inventory: u32,
}

/// Product Pricing Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPricingUpdate {
    pub base_price: u64,
    pub compare_at_price: Option<u64>,
    pub discount_percent: u8,
}
