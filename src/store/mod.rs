//! Repositories: one trait per resource shape, PostgreSQL implementations, pool bootstrap.

mod classes;
mod entries;
mod spells;

pub use classes::PgClassRepository;
pub use entries::PgEntryRepository;
pub use spells::PgSpellRepository;

use crate::config::{DatabaseSettings, ResourceDef, ENTRY_RESOURCES};
use crate::filter::{ListFilter, SpellFilter};
use crate::models::{Classe, Incantesimo, SottoClasse, Voce};
use crate::sql::{bind_as, bind_scalar, BuiltQuery, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use std::time::Duration;

/// Rows of one page plus the total matching the filter before slicing.
pub type Page<T> = (Vec<T>, i64);

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Classe>, sqlx::Error>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Classe>, sqlx::Error>;
    /// Subclasses whose parent is `class_id`. Does not check the class exists.
    async fn list_subclasses(
        &self,
        class_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<SottoClasse>, sqlx::Error>;
    async fn get_subclass(
        &self,
        class_id: &str,
        id: &str,
    ) -> Result<Option<SottoClasse>, sqlx::Error>;
}

#[async_trait]
pub trait SpellRepository: Send + Sync {
    async fn list(&self, filter: &SpellFilter) -> Result<Page<Incantesimo>, sqlx::Error>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Incantesimo>, sqlx::Error>;
}

/// Bound to one simple resource's table.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Voce>, sqlx::Error>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Voce>, sqlx::Error>;
}

/// Liveness probe of the backing store.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl Pinger for PgPool {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

/// Every repository the router needs.
#[derive(Clone)]
pub struct Repositories {
    pub classes: Arc<dyn ClassRepository>,
    pub spells: Arc<dyn SpellRepository>,
    pub entries: Vec<(&'static ResourceDef, Arc<dyn EntryRepository>)>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let entries = ENTRY_RESOURCES
            .iter()
            .map(|def| {
                let repo: Arc<dyn EntryRepository> =
                    Arc::new(PgEntryRepository::new(pool.clone(), def));
                (def, repo)
            })
            .collect();
        Repositories {
            classes: Arc::new(PgClassRepository::new(pool.clone())),
            spells: Arc::new(PgSpellRepository::new(pool)),
            entries,
        }
    }
}

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared pool from settings. Fails if the first connection cannot be made.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .max_lifetime(settings.max_lifetime)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&settings.url)
        .await?;
    tracing::info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Run the count statement, then the select, of one list query.
pub(crate) async fn fetch_page<R>(pool: &PgPool, q: &BuiltQuery) -> Result<Page<R>, sqlx::Error>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.count_sql, params = ?q.params, "count");
    let total: i64 = bind_scalar(sqlx::query_scalar(&q.count_sql), &q.params)
        .fetch_one(pool)
        .await?;

    let params = q.select_params();
    tracing::debug!(sql = %q.select_sql, params = ?params, "query");
    let rows = bind_as(sqlx::query_as::<_, R>(&q.select_sql), &params)
        .fetch_all(pool)
        .await?;
    Ok((rows, total))
}

pub(crate) async fn fetch_optional<R>(pool: &PgPool, q: &QueryBuf) -> Result<Option<R>, sqlx::Error>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    bind_as(sqlx::query_as::<_, R>(&q.sql), &q.params)
        .fetch_optional(pool)
        .await
}

/// A nullable JSONB column. SQL `NULL` and a stored JSON `null` both mean absent.
pub(crate) type JsonColumn<T> = Option<Json<Option<T>>>;

pub(crate) fn json_value<T>(column: JsonColumn<T>) -> Option<T> {
    column.and_then(|j| j.0)
}

/// Decode failure for a column whose text is outside the allowed set.
pub(crate) fn bad_value(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unexpected value {:?}", value).into(),
    }
}
