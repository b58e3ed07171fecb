use clap::Args;
use storefront_app::{
    auth::{PgAuthRepository, UserUuid},
    database,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListSessionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User whose sessions to list
    #[arg(long)]
    user: Uuid,
}

pub(crate) async fn run(args: ListSessionsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let sessions = PgAuthRepository::new(pool)
        .list_sessions(UserUuid::from_uuid(args.user))
        .await
        .map_err(|error| format!("failed to list sessions: {error}"))?;

    if sessions.is_empty() {
        println!("no sessions for user {}", args.user);
        return Ok(());
    }

    for session in sessions {
        let state = if session.revoked_at.is_some() {
            "revoked"
        } else {
            "active"
        };

        println!(
            "{}\t{}\tcreated={}\tlast_used={}",
            session.uuid,
            state,
            session.created_at,
            session
                .last_used_at
                .map_or_else(|| "never".to_string(), |at| at.to_string())
        );
    }

    Ok(())
}
