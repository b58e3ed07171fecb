//! Database Config

use std::time::Duration;

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// How long a transaction may wait on a row lock before giving up
    #[arg(long, env = "DB_LOCK_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub db_lock_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.db_lock_timeout_ms)
    }
}
