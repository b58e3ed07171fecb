use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::orders::{OrderStatus, OrdersService, PgOrdersService, records::OrderUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Order to update
    #[arg(long)]
    order: Uuid,

    /// New status: PROCESSING, SHIPPED, DELIVERED or CANCELLED
    #[arg(long)]
    status: OrderStatus,
}

pub(crate) async fn run(args: SetStatusArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let order = PgOrdersService::new(Db::new(pool))
        .update_order_status(OrderUuid::from_uuid(args.order), args.status)
        .await
        .map_err(|error| format!("failed to update order: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("status: {}", order.status);
    println!("updated_at: {}", order.updated_at);
    if order.status == OrderStatus::Cancelled {
        let units: u32 = order.items.iter().map(|item| item.quantity).sum();
        println!("restocked_units: {units}");
    }

    Ok(())
}
