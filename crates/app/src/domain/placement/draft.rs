//! Order Drafts

use crate::{
    auth::UserUuid,
    domain::{
        addresses::records::AddressUuid,
        carts::records::{CartLineKey, CheckedOutLine},
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemUuid, OrderUuid},
        },
        products::records::ProductUuid,
        variants::{Color, Size},
    },
};

/// Where the lines of a draft came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftSource {
    SingleItem,
    /// The cart lines behind the draft, as read while building it.
    Cart(Vec<CheckedOutLine>),
}

/// What an order takes out of the cart once it has been placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purchased {
    /// Any cart line holding one of these variants.
    Variants(Vec<CartLineKey>),
    /// Exactly these lines, up to the quantity checked out.
    CartLines(Vec<CheckedOutLine>),
}

/// A validated line with its price locked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub size: Size,
    pub color: Color,
}

impl DraftLine {
    /// `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }

    #[must_use]
    pub fn cart_key(&self) -> CartLineKey {
        CartLineKey {
            product_uuid: self.product_uuid,
            size: self.size,
            color: self.color,
        }
    }
}

/// A validated, priced order that has not reserved anything yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub user_uuid: UserUuid,
    pub address_uuid: AddressUuid,
    pub source: DraftSource,
    /// Never empty.
    pub lines: Vec<DraftLine>,
    pub customer_note: Option<String>,
}

impl OrderDraft {
    /// Sum of the line totals, `None` on overflow.
    #[must_use]
    pub fn total_amount(&self) -> Option<u64> {
        self.lines
            .iter()
            .try_fold(0_u64, |total, line| total.checked_add(line.line_total()?))
    }

    /// A direct purchase clears whatever cart line holds the same variant; a
    /// checkout only touches the lines it read.
    #[must_use]
    pub fn purchased(&self) -> Purchased {
        match &self.source {
            DraftSource::SingleItem => {
                let mut keys: Vec<CartLineKey> = Vec::with_capacity(self.lines.len());

                for key in self.lines.iter().map(DraftLine::cart_key) {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }

                Purchased::Variants(keys)
            }
            DraftSource::Cart(lines) => Purchased::CartLines(lines.clone()),
        }
    }

    pub(crate) fn into_new_order(self, uuid: OrderUuid, total_amount: u64) -> NewOrder {
        NewOrder {
            uuid,
            address_uuid: self.address_uuid,
            total_amount,
            customer_note: self.customer_note,
            items: self
                .lines
                .into_iter()
                .map(|line| NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: line.product_uuid,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    size: line.size,
                    color: line.color,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::carts::records::CartLineUuid;

    use super::*;

    fn line(product_uuid: ProductUuid, quantity: u32, unit_price: u64) -> DraftLine {
        DraftLine {
            product_uuid,
            quantity,
            unit_price,
            size: Size::M,
            color: Color::Black,
        }
    }

    fn draft(lines: Vec<DraftLine>) -> OrderDraft {
        OrderDraft {
            user_uuid: UserUuid::new(),
            address_uuid: AddressUuid::new(),
            source: DraftSource::SingleItem,
            lines,
            customer_note: None,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let draft = draft(vec![
            line(ProductUuid::new(), 3, 8_000),
            line(ProductUuid::new(), 2, 1_699),
        ]);

        assert_eq!(draft.total_amount(), Some(27_398));
    }

    #[test]
    fn total_overflow_is_reported() {
        let draft = draft(vec![line(ProductUuid::new(), 99, u64::MAX / 2)]);

        assert_eq!(draft.total_amount(), None);
    }

    #[test]
    fn direct_purchase_clears_the_variant() {
        let product = ProductUuid::new();

        let draft = draft(vec![line(product, 1, 100), line(product, 2, 100)]);

        assert_eq!(
            draft.purchased(),
            Purchased::Variants(vec![CartLineKey {
                product_uuid: product,
                size: Size::M,
                color: Color::Black,
            }])
        );
    }

    #[test]
    fn checkout_takes_the_lines_it_read() {
        let checked_out = vec![CheckedOutLine {
            uuid: CartLineUuid::new(),
            quantity: 2,
        }];

        let draft = OrderDraft {
            source: DraftSource::Cart(checked_out.clone()),
            ..draft(vec![line(ProductUuid::new(), 2, 100)])
        };

        assert_eq!(draft.purchased(), Purchased::CartLines(checked_out));
    }

    #[test]
    fn new_order_keeps_line_order() {
        let first = ProductUuid::new();
        let second = ProductUuid::new();

        let order = draft(vec![line(first, 1, 100), line(second, 1, 200)])
            .into_new_order(OrderUuid::new(), 300);

        assert_eq!(
            order
                .items
                .iter()
                .map(|item| item.product_uuid)
                .collect::<Vec<_>>(),
            vec![first, second]
        );
        assert_eq!(order.total_amount, 300);
    }
}
