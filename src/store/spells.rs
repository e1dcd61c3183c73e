//! Spells in PostgreSQL.

use super::{
    bad_value, fetch_optional, fetch_page, json_value, JsonColumn, Page, SpellRepository,
};
use crate::config::SPELLS;
use crate::filter::SpellFilter;
use crate::models::{Componente, EffettoIncantesimo, Incantesimo, ScuolaDiMagia};
use crate::sql::{select_by_id, ListQuery};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct IncantesimoRow {
    id: String,
    nome: String,
    livello: i32,
    scuola_di_magia: String,
    tempo_di_lancio: String,
    gittata: String,
    area: Option<String>,
    concentrazione: bool,
    sempre_preparato: bool,
    rituale: bool,
    componenti: Option<Vec<String>>,
    componenti_materiali: Option<String>,
    durata: String,
    descrizione: String,
    effetto_incantesimo: JsonColumn<EffettoIncantesimo>,
    effetto_livello_maggiore: JsonColumn<EffettoIncantesimo>,
    classi: String,
    documentazione_di_riferimento: String,
}

impl TryFrom<IncantesimoRow> for Incantesimo {
    type Error = sqlx::Error;

    fn try_from(r: IncantesimoRow) -> Result<Self, Self::Error> {
        let scuola_di_magia = ScuolaDiMagia::parse(&r.scuola_di_magia)
            .ok_or_else(|| bad_value("scuola_di_magia", &r.scuola_di_magia))?;
        let componenti = r
            .componenti
            .unwrap_or_default()
            .iter()
            .map(|c| Componente::parse(c).ok_or_else(|| bad_value("componenti", c)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Incantesimo {
            id: r.id,
            nome: r.nome,
            livello: r.livello,
            scuola_di_magia,
            tempo_di_lancio: r.tempo_di_lancio,
            gittata: r.gittata,
            area: r.area.filter(|a| !a.is_empty()),
            concentrazione: r.concentrazione,
            sempre_preparato: r.sempre_preparato,
            rituale: r.rituale,
            effetto_incantesimo: json_value(r.effetto_incantesimo),
            componenti,
            componenti_materiali: r.componenti_materiali.filter(|m| !m.is_empty()),
            durata: r.durata,
            descrizione: r.descrizione,
            effetto_livello_maggiore: json_value(r.effetto_livello_maggiore),
            classi: r.classi,
            documentazione_di_riferimento: r.documentazione_di_riferimento,
        })
    }
}

pub struct PgSpellRepository {
    pool: PgPool,
}

impl PgSpellRepository {
    pub fn new(pool: PgPool) -> Self {
        PgSpellRepository { pool }
    }
}

#[async_trait]
impl SpellRepository for PgSpellRepository {
    async fn list(&self, filter: &SpellFilter) -> Result<Page<Incantesimo>, sqlx::Error> {
        let q = ListQuery::new(&SPELLS).filter(filter).build();
        let (rows, total) = fetch_page::<IncantesimoRow>(&self.pool, &q).await?;
        let items = rows
            .into_iter()
            .map(Incantesimo::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Incantesimo>, sqlx::Error> {
        let q = select_by_id(&SPELLS, id);
        fetch_optional::<IncantesimoRow>(&self.pool, &q)
            .await?
            .map(Incantesimo::try_from)
            .transpose()
    }
}
