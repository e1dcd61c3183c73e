//! Classes and their subclasses in PostgreSQL.

use super::{
    bad_value, fetch_optional, fetch_page, json_value, ClassRepository, JsonColumn, Page,
};
use crate::config::{CLASSES, SUBCLASSES};
use crate::filter::ListFilter;
use crate::models::{
    Classe, DadoVita, EquipaggiamentoPartenza, ProprietaLivello, RiferimentoSottoclasse,
    SottoClasse,
};
use crate::sql::{bind_as, select_by_id, select_child_by_id, select_child_refs, ListQuery};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct ClasseRow {
    id: String,
    nome: String,
    descrizione: Option<String>,
    documentazione_di_riferimento: String,
    dado_vita: String,
    equipaggiamento_partenza: JsonColumn<EquipaggiamentoPartenza>,
    proprieta_di_classe: JsonColumn<Vec<ProprietaLivello>>,
}

impl ClasseRow {
    fn into_model(self, sottoclassi: Vec<RiferimentoSottoclasse>) -> Result<Classe, sqlx::Error> {
        let dado_vita =
            DadoVita::parse(&self.dado_vita).ok_or_else(|| bad_value("dado_vita", &self.dado_vita))?;
        Ok(Classe {
            id: self.id,
            nome: self.nome,
            descrizione: self.descrizione.unwrap_or_default(),
            documentazione_di_riferimento: self.documentazione_di_riferimento,
            dado_vita,
            elenco_sottoclassi: sottoclassi,
            equipaggiamento_partenza: json_value(self.equipaggiamento_partenza)
                .filter(|e| !e.is_empty()),
            proprieta_di_classe: json_value(self.proprieta_di_classe).unwrap_or_default(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct SottoClasseRow {
    id: String,
    nome: String,
    descrizione: Option<String>,
    documentazione_di_riferimento: String,
    id_classe_associata: String,
    proprieta_di_sottoclasse: JsonColumn<Vec<ProprietaLivello>>,
}

impl From<SottoClasseRow> for SottoClasse {
    fn from(r: SottoClasseRow) -> Self {
        SottoClasse {
            id: r.id,
            nome: r.nome,
            descrizione: r.descrizione.unwrap_or_default(),
            documentazione_di_riferimento: r.documentazione_di_riferimento,
            id_classe_associata: r.id_classe_associata,
            proprieta_di_sottoclasse: json_value(r.proprieta_di_sottoclasse).unwrap_or_default(),
        }
    }
}

pub struct PgClassRepository {
    pool: PgPool,
}

impl PgClassRepository {
    pub fn new(pool: PgPool) -> Self {
        PgClassRepository { pool }
    }

    /// One round trip for all the given classes; keys are class ids.
    async fn subclass_refs(
        &self,
        class_ids: &[String],
    ) -> Result<HashMap<String, Vec<RiferimentoSottoclasse>>, sqlx::Error> {
        let mut out: HashMap<String, Vec<RiferimentoSottoclasse>> = HashMap::new();
        if class_ids.is_empty() {
            return Ok(out);
        }
        let Some(q) = select_child_refs(&SUBCLASSES, class_ids) else {
            return Ok(out);
        };
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows: Vec<(String, String)> = bind_as(sqlx::query_as(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        for (id, class_id) in rows {
            out.entry(class_id)
                .or_default()
                .push(RiferimentoSottoclasse { id_sottoclasse: id });
        }
        Ok(out)
    }
}

#[async_trait]
impl ClassRepository for PgClassRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Classe>, sqlx::Error> {
        let q = ListQuery::new(&CLASSES).filter(filter).build();
        let (rows, total) = fetch_page::<ClasseRow>(&self.pool, &q).await?;
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut refs = self.subclass_refs(&ids).await?;
        let items = rows
            .into_iter()
            .map(|r| {
                let subs = refs.remove(&r.id).unwrap_or_default();
                r.into_model(subs)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Classe>, sqlx::Error> {
        let q = select_by_id(&CLASSES, id);
        let Some(row) = fetch_optional::<ClasseRow>(&self.pool, &q).await? else {
            return Ok(None);
        };
        let mut refs = self.subclass_refs(&[row.id.clone()]).await?;
        let subs = refs.remove(&row.id).unwrap_or_default();
        row.into_model(subs).map(Some)
    }

    async fn list_subclasses(
        &self,
        class_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<SottoClasse>, sqlx::Error> {
        let q = ListQuery::new(&SUBCLASSES)
            .scoped_to(class_id)
            .filter(filter)
            .build();
        let (rows, total) = fetch_page::<SottoClasseRow>(&self.pool, &q).await?;
        Ok((rows.into_iter().map(SottoClasse::from).collect(), total))
    }

    async fn get_subclass(
        &self,
        class_id: &str,
        id: &str,
    ) -> Result<Option<SottoClasse>, sqlx::Error> {
        let Some(q) = select_child_by_id(&SUBCLASSES, class_id, id) else {
            return Ok(None);
        };
        let row = fetch_optional::<SottoClasseRow>(&self.pool, &q).await?;
        Ok(row.map(SottoClasse::from))
    }
}
