//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::{data::NewCartLine, records::CartLineUuid},
    variants::{Color, Size, UnknownVariant},
};

use crate::{
    carts::{errors::into_status_error, get::CartLineResponse},
    extensions::*,
    state::State,
};

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartLineRequest {
    pub product_uuid: Uuid,

    /// Between 1 and 99. Adding a product that is already in the cart in the
    /// same size and color increases that line instead.
    pub quantity: u32,

    /// Defaults to `M`
    pub size: Option<String>,

    /// Defaults to `BLACK`
    pub color: Option<String>,
}

impl TryFrom<AddCartLineRequest> for NewCartLine {
    type Error = UnknownVariant;

    fn try_from(request: AddCartLineRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: CartLineUuid::new(),
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
            size: request
                .size
                .as_deref()
                .map(str::parse::<Size>)
                .transpose()?
                .unwrap_or_default(),
            color: request
                .color
                .as_deref()
                .map(str::parse::<Color>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Add Cart Line Handler
#[endpoint(
    tags("cart"),
    summary = "Add Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Line added or merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Unknown product, size or color"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.lines.add",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(request.product_uuid));

    let line = NewCartLine::try_from(request)
        .map_err(|error| StatusError::unprocessable_entity().brief(error.to_string()))?;

    let line = state
        .app
        .carts
        .add_line(user, line)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(line.into()))
}
