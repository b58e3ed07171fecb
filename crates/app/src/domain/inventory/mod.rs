//! Inventory

pub mod errors;
pub mod ledger;
pub(crate) mod repository;

pub use errors::InventoryLedgerError;
pub use ledger::*;
