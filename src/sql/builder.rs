//! Builds parameterized count and select statements from catalog definitions and filter predicates.

use super::params::PgBindValue;
use crate::config::{ResourceDef, ID_COLUMN, NAME_COLUMN};
use crate::filter::{FilterSpec, SortOrder, DEFAULT_LIMIT};

/// Quote identifier for PostgreSQL (safe: only from catalog definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(def: &ResourceDef) -> String {
    def.columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape `\`, `%` and `_` so user input matches literally inside an ILIKE pattern.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// One `AND` condition of a list query. Columns are catalog constants, values are always bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive literal substring.
    Contains { column: &'static str, value: String },
    /// Column equals any of the values.
    AnyOf {
        column: &'static str,
        values: Vec<String>,
    },
    /// Array column holds every value.
    ContainsAll {
        column: &'static str,
        values: Vec<String>,
    },
    Equals {
        column: &'static str,
        value: PgBindValue,
    },
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match self {
            Predicate::Contains { column, .. }
            | Predicate::AnyOf { column, .. }
            | Predicate::ContainsAll { column, .. }
            | Predicate::Equals { column, .. } => *column,
        }
    }

    fn render(&self, q: &mut QueryBuf) -> String {
        let col = quoted(self.column());
        match self {
            Predicate::Contains { value, .. } => {
                let n = q.push_param(PgBindValue::Text(format!("%{}%", escape_like(value))));
                format!("{} ILIKE ${} ESCAPE '\\'", col, n)
            }
            Predicate::AnyOf { values, .. } => {
                let n = q.push_param(PgBindValue::TextArray(values.clone()));
                format!("{} = ANY(${})", col, n)
            }
            Predicate::ContainsAll { values, .. } => {
                let n = q.push_param(PgBindValue::TextArray(values.clone()));
                format!("{} @> ${}", col, n)
            }
            Predicate::Equals { value, .. } => {
                let n = q.push_param(value.clone());
                format!("{} = ${}", col, n)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Count and select statements sharing one set of filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub count_sql: String,
    pub select_sql: String,
    /// Filter parameters, shared by both statements.
    pub params: Vec<PgBindValue>,
    pub limit: i64,
    pub offset: i64,
}

impl BuiltQuery {
    /// Parameters for the select statement: the filter ones, then limit and offset.
    pub fn select_params(&self) -> Vec<PgBindValue> {
        let mut out = self.params.clone();
        out.push(PgBindValue::BigInt(self.limit));
        out.push(PgBindValue::BigInt(self.offset));
        out
    }
}

/// A list query over one catalog table: `WHERE 1=1` plus scope and filter predicates.
#[derive(Debug)]
pub struct ListQuery<'a> {
    def: &'a ResourceDef,
    predicates: Vec<Predicate>,
    sort: SortOrder,
    limit: i64,
    offset: i64,
}

impl<'a> ListQuery<'a> {
    pub fn new(def: &'a ResourceDef) -> Self {
        ListQuery {
            def,
            predicates: Vec::new(),
            sort: SortOrder::Asc,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Restrict a child resource to one parent. No-op for top-level resources.
    pub fn scoped_to(mut self, parent_id: &str) -> Self {
        if let Some(parent) = self.def.parent {
            self.predicates.push(Predicate::Equals {
                column: parent.column,
                value: PgBindValue::Text(parent_id.to_string()),
            });
        }
        self
    }

    pub fn filter(mut self, spec: &impl FilterSpec) -> Self {
        self.predicates.extend(spec.predicates());
        self.sort = spec.sort();
        self.limit = spec.limit();
        self.offset = spec.offset();
        self
    }

    /// Predicates on columns the table does not carry are dropped.
    pub fn build(&self) -> BuiltQuery {
        let mut q = QueryBuf::new();
        let table = quoted(self.def.table);
        let mut where_clause = String::from(" WHERE 1=1");
        for p in &self.predicates {
            if !self.def.has_column(p.column()) {
                continue;
            }
            let cond = p.render(&mut q);
            where_clause.push_str(" AND ");
            where_clause.push_str(&cond);
        }

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause);
        let n = q.params.len();
        let dir = self.sort.as_sql();
        let select_sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} {}, {} {} LIMIT ${} OFFSET ${}",
            column_list(self.def),
            table,
            where_clause,
            quoted(NAME_COLUMN),
            dir,
            quoted(ID_COLUMN),
            dir,
            n + 1,
            n + 2
        );
        BuiltQuery {
            count_sql,
            select_sql,
            params: q.params,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// SELECT by primary key.
pub fn select_by_id(def: &ResourceDef, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Text(id.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(def),
        quoted(def.table),
        quoted(ID_COLUMN),
        n
    );
    q
}

/// SELECT one child row by id, only if it belongs to `parent_id`. None for top-level resources.
pub fn select_child_by_id(def: &ResourceDef, parent_id: &str, id: &str) -> Option<QueryBuf> {
    let parent = def.parent?;
    let mut q = QueryBuf::new();
    let p = q.push_param(PgBindValue::Text(parent_id.to_string()));
    let i = q.push_param(PgBindValue::Text(id.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${} AND {} = ${}",
        column_list(def),
        quoted(def.table),
        quoted(parent.column),
        p,
        quoted(ID_COLUMN),
        i
    );
    Some(q)
}

/// Batched reverse lookup: `(id, parent id)` of every child of the given parents, by child name.
pub fn select_child_refs(def: &ResourceDef, parent_ids: &[String]) -> Option<QueryBuf> {
    let parent = def.parent?;
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::TextArray(parent_ids.to_vec()));
    q.sql = format!(
        "SELECT {id}, {fk} FROM {} WHERE {fk} = ANY(${}) ORDER BY {} ASC, {id} ASC",
        quoted(def.table),
        n,
        quoted(NAME_COLUMN),
        id = quoted(ID_COLUMN),
        fk = quoted(parent.column),
    );
    Some(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CLASSES, ENTRY_RESOURCES, SPELLS, SUBCLASSES};
    use crate::filter::{ListFilter, SpellFilter};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }

    #[test]
    fn unfiltered_list() {
        let def = &ENTRY_RESOURCES[0];
        let q = ListQuery::new(def).filter(&ListFilter::default()).build();
        assert_eq!(q.count_sql, "SELECT COUNT(*) FROM \"background\" WHERE 1=1");
        assert_eq!(
            q.select_sql,
            "SELECT \"id\", \"nome\", \"descrizione\", \"documentazione_di_riferimento\" FROM \"background\" WHERE 1=1 ORDER BY \"nome\" ASC, \"id\" ASC LIMIT $1 OFFSET $2"
        );
        assert!(q.params.is_empty());
        assert_eq!(
            q.select_params(),
            vec![PgBindValue::BigInt(20), PgBindValue::BigInt(0)]
        );
    }

    #[test]
    fn base_filters_share_params() {
        let f = ListFilter::from_pairs(&pairs(&[
            ("nome", "50%_off"),
            ("documentazione-di-riferimento", "DND 2014"),
            ("sort", "desc"),
            ("$limit", "5"),
            ("$offset", "10"),
        ]))
        .unwrap();
        let q = ListQuery::new(&CLASSES).filter(&f).build();
        assert_eq!(
            q.count_sql,
            "SELECT COUNT(*) FROM \"classi\" WHERE 1=1 AND \"nome\" ILIKE $1 ESCAPE '\\' AND \"documentazione_di_riferimento\" = ANY($2)"
        );
        assert!(q.select_sql.ends_with(
            "AND \"documentazione_di_riferimento\" = ANY($2) ORDER BY \"nome\" DESC, \"id\" DESC LIMIT $3 OFFSET $4"
        ));
        assert!(!q.count_sql.contains("ORDER BY"));
        assert!(!q.count_sql.contains("LIMIT"));
        assert_eq!(
            q.params,
            vec![
                PgBindValue::Text("%50\\%\\_off%".into()),
                PgBindValue::TextArray(vec!["DND 2014".into()]),
            ]
        );
        assert_eq!(q.limit, 5);
        assert_eq!(q.offset, 10);
    }

    #[test]
    fn spell_filters_render_in_order() {
        let f = SpellFilter::from_pairs(&pairs(&[
            ("livello", "2"),
            ("rituale", "true"),
            ("componenti", "V"),
            ("componenti", "S"),
            ("classi", "Mago"),
            ("classi", "Bardo"),
        ]))
        .unwrap();
        let q = ListQuery::new(&SPELLS).filter(&f).build();
        assert_eq!(
            q.count_sql,
            "SELECT COUNT(*) FROM \"incantesimi\" WHERE 1=1 AND \"livello\" = $1 AND \"rituale\" = $2 AND \"componenti\" @> $3 AND \"classi\" ILIKE $4 ESCAPE '\\' AND \"classi\" ILIKE $5 ESCAPE '\\'"
        );
        assert_eq!(
            q.params,
            vec![
                PgBindValue::Int(2),
                PgBindValue::Bool(true),
                PgBindValue::TextArray(vec!["V".into(), "S".into()]),
                PgBindValue::Text("%Mago%".into()),
                PgBindValue::Text("%Bardo%".into()),
            ]
        );
        assert!(q.select_sql.ends_with("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn predicates_on_unknown_columns_are_dropped() {
        let f = SpellFilter::from_pairs(&pairs(&[("livello", "1"), ("nome", "luce")])).unwrap();
        let q = ListQuery::new(&ENTRY_RESOURCES[0]).filter(&f).build();
        assert_eq!(
            q.count_sql,
            "SELECT COUNT(*) FROM \"background\" WHERE 1=1 AND \"nome\" ILIKE $1 ESCAPE '\\'"
        );
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn child_lists_are_scoped_first() {
        let f = ListFilter::from_pairs(&pairs(&[("nome", "cammino")])).unwrap();
        let q = ListQuery::new(&SUBCLASSES).scoped_to("barbaro").filter(&f).build();
        assert_eq!(
            q.count_sql,
            "SELECT COUNT(*) FROM \"sottoclassi\" WHERE 1=1 AND \"id_classe_associata\" = $1 AND \"nome\" ILIKE $2 ESCAPE '\\'"
        );
        assert_eq!(q.params[0], PgBindValue::Text("barbaro".into()));

        let top = ListQuery::new(&CLASSES).scoped_to("barbaro").build();
        assert!(top.params.is_empty());
    }

    #[test]
    fn single_row_lookups() {
        let q = select_by_id(&SPELLS, "palla-di-fuoco");
        assert!(q.sql.starts_with("SELECT \"id\", \"nome\", \"livello\""));
        assert!(q.sql.ends_with("FROM \"incantesimi\" WHERE \"id\" = $1"));
        assert_eq!(q.params, vec![PgBindValue::Text("palla-di-fuoco".into())]);

        let q = select_child_by_id(&SUBCLASSES, "barbaro", "berserker").unwrap();
        assert!(q
            .sql
            .ends_with("FROM \"sottoclassi\" WHERE \"id_classe_associata\" = $1 AND \"id\" = $2"));
        assert_eq!(q.params.len(), 2);
        assert!(select_child_by_id(&CLASSES, "a", "b").is_none());
    }

    #[test]
    fn child_refs_are_batched() {
        let ids = vec!["barbaro".to_string(), "mago".to_string()];
        let q = select_child_refs(&SUBCLASSES, &ids).unwrap();
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"id_classe_associata\" FROM \"sottoclassi\" WHERE \"id_classe_associata\" = ANY($1) ORDER BY \"nome\" ASC, \"id\" ASC"
        );
        assert_eq!(q.params, vec![PgBindValue::TextArray(ids)]);
    }
}
