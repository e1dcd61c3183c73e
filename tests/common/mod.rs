#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use quintaedizione_api::config::{HttpSettings, ResourceDef, ENTRY_RESOURCES};
use quintaedizione_api::filter::{ListFilter, SortOrder, SpellFilter};
use quintaedizione_api::models::{
    Classe, Componente, DadoVita, Incantesimo, RiferimentoSottoclasse, ScuolaDiMagia, SottoClasse,
    Voce,
};
use quintaedizione_api::service::{Logger, SharedLogger};
use quintaedizione_api::store::{
    ClassRepository, EntryRepository, Page, Pinger, Repositories, SpellRepository,
};
use quintaedizione_api::{build_router, AppState};

pub const API_KEY: &str = "test-secret-key";
pub const SOURCE: &str = "DND 2024";

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Same semantics as the SQL predicates built from a `ListFilter`.
fn matches_base(nome: &str, source: &str, filter: &ListFilter) -> bool {
    let nome_ok = filter.nome.as_deref().map_or(true, |n| contains_ci(nome, n));
    let source_ok =
        filter.documentazione.is_empty() || filter.documentazione.iter().any(|d| d == source);
    nome_ok && source_ok
}

/// Sort by (nome, id), then slice `offset..offset+limit`. Total is taken before slicing.
fn paginate<T: Clone>(
    mut items: Vec<T>,
    key: impl Fn(&T) -> (String, String),
    filter: &ListFilter,
) -> Page<T> {
    items.sort_by_key(|i| key(i));
    if filter.sort == SortOrder::Desc {
        items.reverse();
    }
    let total = items.len() as i64;
    let page = items
        .into_iter()
        .skip(filter.offset as usize)
        .take(filter.limit as usize)
        .collect();
    (page, total)
}

pub fn classe(id: &str, nome: &str, dado_vita: DadoVita) -> Classe {
    Classe {
        id: id.into(),
        nome: nome.into(),
        descrizione: String::new(),
        documentazione_di_riferimento: SOURCE.into(),
        dado_vita,
        elenco_sottoclassi: Vec::new(),
        equipaggiamento_partenza: None,
        proprieta_di_classe: Vec::new(),
    }
}

pub fn sottoclasse(id: &str, nome: &str, parent: &str) -> SottoClasse {
    SottoClasse {
        id: id.into(),
        nome: nome.into(),
        descrizione: String::new(),
        documentazione_di_riferimento: SOURCE.into(),
        id_classe_associata: parent.into(),
        proprieta_di_sottoclasse: Vec::new(),
    }
}

pub fn incantesimo(id: &str, nome: &str, livello: i32, scuola: ScuolaDiMagia) -> Incantesimo {
    Incantesimo {
        id: id.into(),
        nome: nome.into(),
        livello,
        scuola_di_magia: scuola,
        tempo_di_lancio: "1 azione".into(),
        gittata: "Personale".into(),
        area: None,
        concentrazione: false,
        sempre_preparato: false,
        rituale: false,
        effetto_incantesimo: None,
        componenti: vec![Componente::Verbale, Componente::Somatica],
        componenti_materiali: None,
        durata: "Istantanea".into(),
        descrizione: String::new(),
        effetto_livello_maggiore: None,
        classi: "Mago".into(),
        documentazione_di_riferimento: SOURCE.into(),
    }
}

pub fn voce(id: &str, nome: &str, source: &str) -> Voce {
    Voce {
        id: id.into(),
        nome: nome.into(),
        descrizione: String::new(),
        documentazione_di_riferimento: source.into(),
    }
}

#[derive(Default)]
pub struct MemClasses {
    pub classes: Vec<Classe>,
    pub subclasses: Vec<SottoClasse>,
}

impl MemClasses {
    /// Barbaro (with Berserker and Totemico), Mago, Guerriero.
    pub fn seeded() -> Self {
        MemClasses {
            classes: vec![
                classe("barbaro", "Barbaro", DadoVita::D12),
                classe("mago", "Mago", DadoVita::D6),
                classe("guerriero", "Guerriero", DadoVita::D10),
            ],
            subclasses: vec![
                sottoclasse("berserker", "Berserker", "barbaro"),
                sottoclasse("totemico", "Totemico", "barbaro"),
            ],
        }
    }

    fn with_refs(&self, c: &Classe) -> Classe {
        let mut refs: Vec<&SottoClasse> = self
            .subclasses
            .iter()
            .filter(|s| s.id_classe_associata == c.id)
            .collect();
        refs.sort_by(|a, b| (&a.nome, &a.id).cmp(&(&b.nome, &b.id)));
        Classe {
            elenco_sottoclassi: refs
                .into_iter()
                .map(|s| RiferimentoSottoclasse {
                    id_sottoclasse: s.id.clone(),
                })
                .collect(),
            ..c.clone()
        }
    }
}

#[async_trait]
impl ClassRepository for MemClasses {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Classe>, sqlx::Error> {
        let items = self
            .classes
            .iter()
            .filter(|c| matches_base(&c.nome, &c.documentazione_di_riferimento, filter))
            .map(|c| self.with_refs(c))
            .collect();
        Ok(paginate(items, |c: &Classe| (c.nome.clone(), c.id.clone()), filter))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Classe>, sqlx::Error> {
        Ok(self.classes.iter().find(|c| c.id == id).map(|c| self.with_refs(c)))
    }

    async fn list_subclasses(
        &self,
        class_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<SottoClasse>, sqlx::Error> {
        let items = self
            .subclasses
            .iter()
            .filter(|s| s.id_classe_associata == class_id)
            .filter(|s| matches_base(&s.nome, &s.documentazione_di_riferimento, filter))
            .cloned()
            .collect();
        Ok(paginate(items, |s: &SottoClasse| (s.nome.clone(), s.id.clone()), filter))
    }

    async fn get_subclass(
        &self,
        class_id: &str,
        id: &str,
    ) -> Result<Option<SottoClasse>, sqlx::Error> {
        Ok(self
            .subclasses
            .iter()
            .find(|s| s.id == id && s.id_classe_associata == class_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemSpells {
    pub spells: Vec<Incantesimo>,
}

impl MemSpells {
    pub fn seeded() -> Self {
        let palla = Incantesimo {
            componenti: vec![Componente::Verbale, Componente::Somatica, Componente::Materiale],
            componenti_materiali: Some("una pallina di guano di pipistrello e zolfo".into()),
            gittata: "45 metri".into(),
            area: Some("sfera di 6 metri".into()),
            classi: "Mago, Stregone".into(),
            ..incantesimo("palla-di-fuoco", "Palla di Fuoco", 3, ScuolaDiMagia::Evocazione)
        };
        let individuazione = Incantesimo {
            concentrazione: true,
            rituale: true,
            durata: "Concentrazione, fino a 10 minuti".into(),
            classi: "Bardo, Chierico, Druido, Mago".into(),
            ..incantesimo(
                "individuazione-del-magico",
                "Individuazione del Magico",
                1,
                ScuolaDiMagia::Divinazione,
            )
        };
        let scudo = Incantesimo {
            tempo_di_lancio: "Reazione".into(),
            ..incantesimo("scudo", "Scudo", 1, ScuolaDiMagia::Abiurazione)
        };
        MemSpells {
            spells: vec![palla, individuazione, scudo],
        }
    }
}

fn matches_spell(s: &Incantesimo, f: &SpellFilter) -> bool {
    let text = |value: &str, wanted: &Option<String>| {
        wanted.as_deref().map_or(true, |w| contains_ci(value, w))
    };
    matches_base(&s.nome, &s.documentazione_di_riferimento, &f.base)
        && f.livello.map_or(true, |l| s.livello == l)
        && f.scuola_di_magia.map_or(true, |sc| s.scuola_di_magia == sc)
        && f.concentrazione.map_or(true, |c| s.concentrazione == c)
        && f.rituale.map_or(true, |r| s.rituale == r)
        && f.componenti.iter().all(|c| s.componenti.contains(c))
        && text(
            s.componenti_materiali.as_deref().unwrap_or_default(),
            &f.componenti_materiali,
        )
        && text(&s.tempo_di_lancio, &f.tempo_di_lancio)
        && text(&s.gittata, &f.gittata)
        && text(&s.durata, &f.durata)
        && f.classi.iter().all(|c| contains_ci(&s.classi, c))
}

#[async_trait]
impl SpellRepository for MemSpells {
    async fn list(&self, filter: &SpellFilter) -> Result<Page<Incantesimo>, sqlx::Error> {
        let items = self
            .spells
            .iter()
            .filter(|s| matches_spell(s, filter))
            .cloned()
            .collect();
        Ok(paginate(
            items,
            |s: &Incantesimo| (s.nome.clone(), s.id.clone()),
            &filter.base,
        ))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Incantesimo>, sqlx::Error> {
        Ok(self.spells.iter().find(|s| s.id == id).cloned())
    }
}

#[derive(Default)]
pub struct MemEntries {
    pub entries: Vec<Voce>,
}

#[async_trait]
impl EntryRepository for MemEntries {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Voce>, sqlx::Error> {
        let items = self
            .entries
            .iter()
            .filter(|v| matches_base(&v.nome, &v.documentazione_di_riferimento, filter))
            .cloned()
            .collect();
        Ok(paginate(items, |v: &Voce| (v.nome.clone(), v.id.clone()), filter))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Voce>, sqlx::Error> {
        Ok(self.entries.iter().find(|v| v.id == id).cloned())
    }
}

/// Every call fails as if the pool were exhausted.
pub struct Broken;

#[async_trait]
impl ClassRepository for Broken {
    async fn list(&self, _: &ListFilter) -> Result<Page<Classe>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn get_by_id(&self, _: &str) -> Result<Option<Classe>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn list_subclasses(&self, _: &str, _: &ListFilter) -> Result<Page<SottoClasse>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn get_subclass(&self, _: &str, _: &str) -> Result<Option<SottoClasse>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl SpellRepository for Broken {
    async fn list(&self, _: &SpellFilter) -> Result<Page<Incantesimo>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn get_by_id(&self, _: &str) -> Result<Option<Incantesimo>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl EntryRepository for Broken {
    async fn list(&self, _: &ListFilter) -> Result<Page<Voce>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn get_by_id(&self, _: &str) -> Result<Option<Voce>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

/// Classes that answer only after `delay`, or panic when `delay` is `None`.
pub struct Stalled {
    pub delay: Option<Duration>,
    pub inner: MemClasses,
}

impl Stalled {
    async fn stall(&self) {
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => panic!("repository exploded"),
        }
    }
}

#[async_trait]
impl ClassRepository for Stalled {
    async fn list(&self, filter: &ListFilter) -> Result<Page<Classe>, sqlx::Error> {
        self.stall().await;
        self.inner.list(filter).await
    }
    async fn get_by_id(&self, id: &str) -> Result<Option<Classe>, sqlx::Error> {
        self.stall().await;
        self.inner.get_by_id(id).await
    }
    async fn list_subclasses(
        &self,
        class_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<SottoClasse>, sqlx::Error> {
        self.stall().await;
        self.inner.list_subclasses(class_id, filter).await
    }
    async fn get_subclass(
        &self,
        class_id: &str,
        id: &str,
    ) -> Result<Option<SottoClasse>, sqlx::Error> {
        self.stall().await;
        self.inner.get_subclass(class_id, id).await
    }
}

pub struct FakePinger {
    pub healthy: bool,
}

#[async_trait]
impl Pinger for FakePinger {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.healthy {
            Ok(())
        } else {
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

/// Records every event passed to the sink.
#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<(String, Option<String>)>>,
}

impl Logger for RecordingLogger {
    fn error(&self, event: &str, id: Option<&str>, _error: &sqlx::Error) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), id.map(str::to_string)));
    }
}

fn entry_repo(def: &ResourceDef) -> Arc<dyn EntryRepository> {
    let entries = if def.path == "talenti" {
        vec![
            voce("allerta", "Allerta", SOURCE),
            voce("fortunato", "Fortunato", SOURCE),
            voce("lottatore", "Lottatore", "Manuale Extra"),
        ]
    } else {
        Vec::new()
    };
    Arc::new(MemEntries { entries })
}

pub fn seeded_repositories() -> Repositories {
    Repositories {
        classes: Arc::new(MemClasses::seeded()),
        spells: Arc::new(MemSpells::seeded()),
        entries: ENTRY_RESOURCES.iter().map(|def| (def, entry_repo(def))).collect(),
    }
}

/// Seeded repositories whose class lookups go through [`Stalled`].
pub fn stalled_repositories(delay: Option<Duration>) -> Repositories {
    Repositories {
        classes: Arc::new(Stalled {
            delay,
            inner: MemClasses::seeded(),
        }),
        ..seeded_repositories()
    }
}

pub fn broken_repositories() -> Repositories {
    Repositories {
        classes: Arc::new(Broken),
        spells: Arc::new(Broken),
        entries: ENTRY_RESOURCES
            .iter()
            .map(|def| {
                let repo: Arc<dyn EntryRepository> = Arc::new(Broken);
                (def, repo)
            })
            .collect(),
    }
}

pub fn state_with(repos: Repositories, healthy: bool, logger: SharedLogger) -> AppState {
    AppState::new(repos, Arc::new(FakePinger { healthy }), "1.2.3", logger)
}

pub fn router_with(state: AppState, api_key: &str) -> Router {
    let http = HttpSettings {
        api_key: api_key.to_string(),
        ..HttpSettings::default()
    };
    build_router(state, &http)
}

/// Seeded data behind the given HTTP settings.
pub fn app_with_http(http: HttpSettings) -> Router {
    build_router(state_with(seeded_repositories(), true, None), &http)
}

/// Seeded data, healthy database, `API_KEY` required.
pub fn test_app() -> Router {
    router_with(state_with(seeded_repositories(), true, None), API_KEY)
}

pub async fn get(app: &Router, uri: &str, api_key: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(key) = api_key {
        request = request.header("x-api-key", key);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response.into_body()).await)
}

pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// `errors[0].code` of an error envelope.
pub fn error_code(body: &serde_json::Value) -> &str {
    body["errors"][0]["code"].as_str().unwrap_or_default()
}
