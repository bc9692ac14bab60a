use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::config::Config;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

pub fn create_pool(config: &Config) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    r2d2::Pool::builder()
        .max_size(config.db_pool_size)
        .build(manager)
}

/// Apply pending migrations, returning how many ran.
pub fn run_migrations(pool: &DbPool) -> Result<usize, MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.len())
}

/// Check a connection out of the pool or return `ApiError::Internal` from the
/// enclosing handler.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                return Err($crate::api::ApiError::Internal);
            }
        }
    };
}
