//! Static catalog definitions: one entry per exposed resource.
//! The query builder and the router read table, column and path names from here only.

/// Columns every resource table carries.
pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "nome";
pub const SOURCE_COLUMN: &str = "documentazione_di_riferimento";

/// Reference from a child resource to the resource it is scoped under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentRef {
    /// Path segment of the parent resource.
    pub path: &'static str,
    /// Our column holding the parent's id.
    pub column: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDef {
    /// Label used in not-found details (e.g. "Classe").
    pub kind: &'static str,
    /// Path segment under `/v1`.
    pub path: &'static str,
    pub table: &'static str,
    /// Name of the id route parameter, reported in validation messages.
    pub id_param: &'static str,
    /// Key of the item array in list responses.
    pub list_key: &'static str,
    pub columns: &'static [&'static str],
    pub parent: Option<ParentRef>,
}

pub const CLASSES: ResourceDef = ResourceDef {
    kind: "Classe",
    path: "classi",
    table: "classi",
    id_param: "id-classe",
    list_key: "classi",
    columns: &[
        "id",
        "nome",
        "descrizione",
        "documentazione_di_riferimento",
        "dado_vita",
        "equipaggiamento_partenza",
        "proprieta_di_classe",
    ],
    parent: None,
};

pub const SUBCLASSES: ResourceDef = ResourceDef {
    kind: "SottoClasse",
    path: "sotto-classi",
    table: "sottoclassi",
    id_param: "id-sotto-classe",
    list_key: "sottoclassi",
    columns: &[
        "id",
        "nome",
        "descrizione",
        "documentazione_di_riferimento",
        "id_classe_associata",
        "proprieta_di_sottoclasse",
    ],
    parent: Some(ParentRef {
        path: "classi",
        column: "id_classe_associata",
    }),
};

pub const SPELLS: ResourceDef = ResourceDef {
    kind: "Incantesimo",
    path: "incantesimi",
    table: "incantesimi",
    id_param: "id-incantesimo",
    list_key: "incantesimi",
    columns: &[
        "id",
        "nome",
        "livello",
        "scuola_di_magia",
        "tempo_di_lancio",
        "gittata",
        "area",
        "concentrazione",
        "sempre_preparato",
        "rituale",
        "componenti",
        "componenti_materiali",
        "durata",
        "descrizione",
        "effetto_incantesimo",
        "effetto_livello_maggiore",
        "classi",
        "documentazione_di_riferimento",
    ],
    parent: None,
};

const ENTRY_COLUMNS: &[&str] = &["id", "nome", "descrizione", "documentazione_di_riferimento"];

const fn entry(kind: &'static str, path: &'static str, id_param: &'static str) -> ResourceDef {
    ResourceDef {
        kind,
        path,
        table: path,
        id_param,
        list_key: path,
        columns: ENTRY_COLUMNS,
        parent: None,
    }
}

/// Resources that share the plain entry shape (id, name, description, source).
pub const ENTRY_RESOURCES: &[ResourceDef] = &[
    entry("Background", "background", "id-background"),
    entry("Bastione", "bastioni", "id-bastione"),
    entry("Condizione", "condizioni", "id-condizione"),
    entry("Divinita", "divinita", "id-divinita"),
    entry("Linguaggio", "linguaggi", "id-linguaggio"),
    entry("Maestria", "maestrie", "id-maestria"),
    entry("Mostro", "mostri", "id-mostro"),
    entry("Oggetto", "oggetti", "id-oggetto"),
    entry("Regola", "regole", "id-regola"),
    entry("Specie", "specie", "id-specie"),
    entry("Talento", "talenti", "id-talento"),
];

/// Every resource definition, parents before children.
pub fn all_resources() -> Vec<&'static ResourceDef> {
    let mut out = vec![&CLASSES, &SUBCLASSES, &SPELLS];
    out.extend(ENTRY_RESOURCES.iter());
    out
}

pub fn entry_by_path(path: &str) -> Option<&'static ResourceDef> {
    ENTRY_RESOURCES.iter().find(|r| r.path == path)
}

impl ResourceDef {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}
