//! Storefront Domain Concerns

pub mod addresses;
pub mod carts;
pub(crate) mod columns;
pub mod inventory;
pub mod orders;
pub mod placement;
pub mod products;
pub mod variants;
