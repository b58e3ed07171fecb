//! Placement Requests
//!
//! Requests carry raw caller input. Quantity, size and color are only checked
//! by the factory, so that each failure surfaces as its own rejection.

use crate::domain::products::records::ProductUuid;

/// Buy one product directly, bypassing the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleItemRequest {
    pub product_uuid: ProductUuid,
    /// `None` when the caller sent something other than an integer.
    pub quantity: Option<i64>,
    /// Defaults to `M` when absent.
    pub size: Option<String>,
    /// Defaults to `BLACK` when absent.
    pub color: Option<String>,
    pub customer_note: Option<String>,
}

/// Buy everything currently in the user's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartCheckoutRequest {
    pub customer_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRequest {
    SingleItem(SingleItemRequest),
    Cart(CartCheckoutRequest),
}

impl OrderRequest {
    /// The customer's note with surrounding whitespace removed. Blank notes are
    /// dropped.
    #[must_use]
    pub fn customer_note(&self) -> Option<String> {
        let note = match self {
            Self::SingleItem(request) => request.customer_note.as_deref(),
            Self::Cart(request) => request.customer_note.as_deref(),
        };

        note.map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_note_is_trimmed() {
        let request = OrderRequest::Cart(CartCheckoutRequest {
            customer_note: Some("  ring twice \n".to_string()),
        });

        assert_eq!(request.customer_note().as_deref(), Some("ring twice"));
    }

    #[test]
    fn blank_customer_note_is_dropped() {
        let request = OrderRequest::Cart(CartCheckoutRequest {
            customer_note: Some("   ".to_string()),
        });

        assert_eq!(request.customer_note(), None);
    }
}
