//! Test Helpers

use crate::{
    auth::UserUuid,
    domain::{
        addresses::{
            AddressesService, AddressesServiceError,
            data::NewAddress,
            records::{AddressRecord, AddressUuid},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
    },
    test::TestContext,
};

/// A product sold at `base_price` with no discount.
pub(crate) async fn create_product(
    ctx: &TestContext,
    base_price: u64,
    inventory: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            base_price,
            compare_at_price: None,
            discount_percent: 0,
            inventory,
        })
        .await
}

pub(crate) async fn create_discounted_product(
    ctx: &TestContext,
    base_price: u64,
    compare_at_price: u64,
    discount_percent: u8,
    inventory: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            base_price,
            compare_at_price: Some(compare_at_price),
            discount_percent,
            inventory,
        })
        .await
}

/// Give `user` a default shipping address.
pub(crate) async fn create_address(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<AddressRecord, AddressesServiceError> {
    ctx.addresses
        .create_address(
            user,
            NewAddress {
                uuid: AddressUuid::new(),
                recipient: "Ada Lovelace".to_string(),
                line_1: "12 St James's Square".to_string(),
                line_2: None,
                city: "London".to_string(),
                postcode: "SW1Y 4JH".to_string(),
                country: "GB".to_string(),
                phone: Some("+44 20 7946 0000".to_string()),
                is_default: true,
            },
        )
        .await
}
