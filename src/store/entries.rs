//! Simple entries: one repository instance per catalog table.

use super::{fetch_optional, fetch_page, EntryRepository, Page};
use crate::config::ResourceDef;
use crate::filter::ListFilter;
use crate::models::Voce;
use crate::sql::{select_by_id, ListQuery};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct VoceRow {
    id: String,
    nome: String,
    descrizione: Option<String>,
    documentazione_di_riferimento: String,
}

impl From<VoceRow> for Voce {
    fn from(r: VoceRow) -> Self {
        Voce {
            id: r.id,
            nome: r.nome,
            descrizione: r.descrizione.unwrap_or_default(),
            documentazione_di_riferimento: r.documentazione_di_riferimento,
        }
    }
}

pub struct PgEntryRepository {
    pool: PgPool,
    def: &'static ResourceDef,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool, def: &'static ResourceDef) -> Self {
        PgEntryRepository { pool, def }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Voce>, sqlx::Error> {
        let q = ListQuery::new(self.def).filter(filter).build();
        let (rows, total) = fetch_page::<VoceRow>(&self.pool, &q).await?;
        Ok((rows.into_iter().map(Voce::from).collect(), total))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Voce>, sqlx::Error> {
        let q = select_by_id(self.def, id);
        let row = fetch_optional::<VoceRow>(&self.pool, &q).await?;
        Ok(row.map(Voce::from))
    }
}
