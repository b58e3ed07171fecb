//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
///
/// Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub base_price: u64,
    pub compare_at_price: Option<u64>,
    /// Whole percent, `0..=100`.
    pub discount_percent: u8,
    /// Units currently available to reserve.
    pub inventory: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
