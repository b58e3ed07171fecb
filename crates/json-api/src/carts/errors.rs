//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::UnknownProduct => {
            StatusError::unprocessable_entity().brief("product not found")
        }
        CartsServiceError::InvalidData => StatusError::bad_request().brief("Invalid cart line"),
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::Sql(source) => {
            error!("failed to access cart: {source}");

            StatusError::internal_server_error()
        }
    }
}
