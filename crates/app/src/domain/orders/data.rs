//! Order Data

use crate::domain::{
    addresses::records::AddressUuid,
    orders::{
        records::{OrderItemUuid, OrderRecord, OrderUuid},
        status::OrderStatus,
    },
    products::records::ProductUuid,
    variants::{Color, Size},
};

/// Orders are listed this many to a page unless the caller asks otherwise.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub address_uuid: AddressUuid,
    pub total_amount: u64,
    pub customer_note: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub size: Size,
    pub color: Color,
}

/// A page request for a user's order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersQuery {
    pub page: u32,
    pub limit: u32,
    /// `None` lists orders in every status.
    pub status: Option<OrderStatus>,
}

impl OrdersQuery {
    /// Build a query from optional caller input. Pages start at 1 and the
    /// limit is clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, status: Option<OrderStatus>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            status,
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(query: &OrdersQuery, total: u64) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total,
            total_pages: total.div_ceil(u64::from(query.limit)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdersPage {
    pub orders: Vec<OrderRecord>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_to_first_page_of_ten() {
        let query = OrdersQuery::default();

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn query_clamps_page_and_limit() {
        let query = OrdersQuery::new(Some(0), Some(500), None);

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 100);

        let query = OrdersQuery::new(Some(3), Some(0), None);

        assert_eq!(query.limit, 1);
        assert_eq!(query.offset(), 2);
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let query = OrdersQuery::new(Some(1), Some(10), None);

        assert_eq!(Pagination::new(&query, 0).total_pages, 0);
        assert_eq!(Pagination::new(&query, 10).total_pages, 1);
        assert_eq!(Pagination::new(&query, 11).total_pages, 2);
    }
}
