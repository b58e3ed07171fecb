use clap::Args;
use storefront_app::{
    auth::{PgAuthRepository, SessionUuid},
    database,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Session UUID to revoke
    #[arg(long)]
    session: Uuid,
}

pub(crate) async fn run(args: RevokeSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let revoked = PgAuthRepository::new(pool)
        .revoke_session(SessionUuid::from_uuid(args.session))
        .await
        .map(|record| record.is_some())
        .map_err(|error| format!("failed to revoke session: {error}"))?;

    if revoked {
        println!("revoked session {}", args.session);
    } else {
        println!("session {} was not active", args.session);
    }

    Ok(())
}
