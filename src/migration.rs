//! Apply the embedded schema migrations (`migrations/*.sql`): one table per resource,
//! `sottoclassi` referencing `classi`, JSONB for nested structures, `TEXT[]` for components.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Idempotent: already applied versions are skipped.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!(count = MIGRATOR.iter().count(), "migrations applied");
    Ok(())
}
