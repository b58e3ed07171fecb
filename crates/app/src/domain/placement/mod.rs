//! Order Placement
//!
//! Turning a purchase request into a persisted order happens in two stages. The
//! [`OrderFactory`] validates the request and prices it into an [`OrderDraft`];
//! the [`OrderTransaction`] then reserves stock, persists the order and tidies
//! the cart, undoing its reservations if anything after them fails.

pub mod draft;
pub mod factory;
pub mod reconciler;
pub mod rejection;
pub mod request;
pub mod service;
pub mod transaction;

pub use draft::{DraftLine, DraftSource, OrderDraft, Purchased};
pub use factory::OrderFactory;
pub use reconciler::CartReconciler;
pub use rejection::{OrderFailure, OrderRejection, OrderResult, PlacementError};
pub use request::{CartCheckoutRequest, OrderRequest, SingleItemRequest};
pub use service::*;
pub use transaction::OrderTransaction;
