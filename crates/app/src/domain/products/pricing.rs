//! Pricing Policy
//!
//! The effective unit price is what a customer is charged for one unit at the
//! moment an order is placed. It is locked into the order line and never
//! recomputed afterwards.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::domain::products::records::ProductRecord;

/// Effective unit price of a product, in minor units.
///
/// A discount only applies when the product carries a compare-at price; the
/// discounted price is taken off that reference price and rounded half away
/// from zero to the minor unit. Otherwise the base price is charged.
#[must_use]
pub fn effective_unit_price(product: &ProductRecord) -> u64 {
    match product.compare_at_price {
        Some(compare_at) if product.discount_percent > 0 => {
            discounted(compare_at, product.discount_percent)
        }
        _ => product.base_price,
    }
}

fn discounted(compare_at: u64, discount_percent: u8) -> u64 {
    let remaining = Decimal::ONE_HUNDRED - Decimal::from(discount_percent.min(100));

    let price = (Decimal::from(compare_at) * remaining / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    // Bounded by `compare_at`, so the conversion cannot fail.
    price.to_u64().unwrap_or(compare_at)
}
