//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::{
    orders::{OrdersServiceError, records::OrderRecord},
    placement::{OrderFailure, PlacementError},
};

/// Map a placement outcome to the response the shopper sees. Rejections and
/// stock shortfalls carry their own message; infrastructure failures only ask
/// the caller to retry.
pub(crate) fn placement_status_error(error: PlacementError) -> StatusError {
    match error {
        PlacementError::Rejected(rejection) => {
            StatusError::unprocessable_entity().brief(rejection.to_string())
        }
        PlacementError::Failed(failure @ OrderFailure::InsufficientStock { .. }) => {
            StatusError::conflict().brief(failure.to_string())
        }
        PlacementError::Failed(failure @ OrderFailure::Infrastructure) => {
            StatusError::internal_server_error().brief(failure.to_string())
        }
    }
}

/// Metric label for a placement outcome.
pub(crate) fn outcome_label(result: &Result<OrderRecord, PlacementError>) -> &'static str {
    match result {
        Ok(_) => "placed",
        Err(PlacementError::Rejected(_)) => "rejected",
        Err(PlacementError::Failed(OrderFailure::InsufficientStock { .. })) => "insufficient_stock",
        Err(PlacementError::Failed(OrderFailure::Infrastructure)) => "failed",
    }
}

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order query"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidTransition { from, to } => {
            StatusError::conflict().brief(format!("Order cannot move from {from} to {to}"))
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to read orders: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use storefront_app::domain::{placement::OrderRejection, products::records::ProductUuid};

    use super::*;

    #[test]
    fn rejections_are_unprocessable() {
        let error = placement_status_error(OrderRejection::InvalidQuantity.into());

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.brief, "quantity must be an integer between 1 and 99");
    }

    #[test]
    fn insufficient_stock_is_a_conflict_with_the_count() {
        let product = ProductUuid::new();

        let error = placement_status_error(
            OrderFailure::InsufficientStock {
                product,
                available: 2,
            }
            .into(),
        );

        assert_eq!(error.code, StatusCode::CONFLICT);
        assert!(error.brief.contains("only 2 units"));
    }

    #[test]
    fn infrastructure_failures_ask_for_a_retry() {
        let error = placement_status_error(OrderFailure::Infrastructure.into());

        assert_eq!(error.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.brief, "order could not be placed, please try again");
    }

    #[test]
    fn outcomes_are_labelled_by_kind() {
        let rejected = Err(PlacementError::from(OrderRejection::EmptyCart));
        let failed = Err(PlacementError::from(OrderFailure::Infrastructure));

        assert_eq!(outcome_label(&rejected), "rejected");
        assert_eq!(outcome_label(&failed), "failed");
    }
}
