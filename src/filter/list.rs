//! Universal list parameters shared by every resource.

use super::validation::{max_chars, max_values, parse_int};
use super::{FilterSpec, QueryParams};
use crate::config::{NAME_COLUMN, SOURCE_COLUMN};
use crate::error::FilterError;
use crate::sql::Predicate;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_SOURCES: usize = 10;
pub const MAX_SOURCE_LEN: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring of `nome`.
    pub nome: Option<String>,
    /// Any-of match on `documentazione_di_riferimento`.
    pub documentazione: Vec<String>,
    pub sort: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListFilter {
    fn default() -> Self {
        ListFilter {
            nome: None,
            documentazione: Vec::new(),
            sort: SortOrder::Asc,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListFilter {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        Self::from_params(&QueryParams::new(pairs))
    }

    /// Parse and validate. Numbers are parsed before the range checks, so a
    /// non-numeric `$offset` wins over a `nome` that is too long.
    pub fn from_params(params: &QueryParams<'_>) -> Result<Self, FilterError> {
        let limit = match params.get("$limit") {
            Some(v) => parse_int("$limit", v)?,
            None => DEFAULT_LIMIT,
        };
        let offset = match params.get("$offset") {
            Some(v) => parse_int("$offset", v)?,
            None => 0,
        };

        let nome = params.get("nome");
        if let Some(n) = nome {
            if n.chars().count() > MAX_NAME_LEN {
                return Err(FilterError(format!("nome cannot exceed {}", MAX_NAME_LEN)));
            }
        }

        let sort = match params.get("sort") {
            None | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(_) => return Err(FilterError::new("sort must be one of: asc desc")),
        };

        if limit < 1 {
            return Err(FilterError::new("limit must be at least 1"));
        }
        if limit > MAX_LIMIT {
            return Err(FilterError(format!("limit cannot exceed {}", MAX_LIMIT)));
        }
        if offset < 0 {
            return Err(FilterError::new("offset must be at least 0"));
        }

        let documentazione = params.all("documentazione-di-riferimento");
        max_values("documentazione-di-riferimento", &documentazione, MAX_SOURCES)?;
        for d in &documentazione {
            max_chars("documentazione-di-riferimento", d, MAX_SOURCE_LEN)?;
        }

        Ok(ListFilter {
            nome: nome.map(str::to_string),
            documentazione,
            sort,
            limit,
            offset,
        })
    }

    /// 1-based page of `offset`; 0 when `limit` is 0.
    pub fn page(&self) -> i64 {
        page_number(self.limit, self.offset)
    }
}

pub fn page_number(limit: i64, offset: i64) -> i64 {
    if limit == 0 {
        0
    } else {
        (offset / limit).saturating_add(1)
    }
}

impl FilterSpec for ListFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(nome) = &self.nome {
            out.push(Predicate::Contains {
                column: NAME_COLUMN,
                value: nome.clone(),
            });
        }
        if !self.documentazione.is_empty() {
            out.push(Predicate::AnyOf {
                column: SOURCE_COLUMN,
                values: self.documentazione.clone(),
            });
        }
        out
    }

    fn sort(&self) -> SortOrder {
        self.sort
    }

    fn limit(&self) -> i64 {
        self.limit
    }

    fn offset(&self) -> i64 {
        self.offset
    }
}
