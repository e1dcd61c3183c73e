//! Spell list parameters: the universal ones plus level, school, flags, components and free text.

use super::validation::{int_in, max_chars, max_values, one_of, parse_bool};
use super::{FilterSpec, ListFilter, QueryParams, SortOrder};
use crate::error::FilterError;
use crate::models::{Componente, ScuolaDiMagia};
use crate::sql::{PgBindValue, Predicate};

pub const MAX_COMPONENTS: usize = 3;
pub const MAX_MATERIALS_LEN: usize = 500;
pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_CLASSES: usize = 20;
pub const MAX_CLASS_LEN: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellFilter {
    pub base: ListFilter,
    pub livello: Option<i32>,
    pub scuola_di_magia: Option<ScuolaDiMagia>,
    pub concentrazione: Option<bool>,
    pub rituale: Option<bool>,
    /// Every listed component must be present (containment, not any-of).
    pub componenti: Vec<Componente>,
    pub componenti_materiali: Option<String>,
    pub tempo_di_lancio: Option<String>,
    pub gittata: Option<String>,
    pub durata: Option<String>,
    /// Each name must appear in the spell's class list.
    pub classi: Vec<String>,
}

impl SpellFilter {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        let params = QueryParams::new(pairs);
        let base = ListFilter::from_params(&params)?;
        let mut filter = SpellFilter {
            base,
            ..Default::default()
        };

        if let Some(v) = params.get("livello") {
            filter.livello = Some(int_in("livello", v, 0, 9)? as i32);
        }

        if let Some(v) = params.get("scuola-di-magia") {
            one_of("scuola-di-magia", v, ScuolaDiMagia::NAMES)?;
            filter.scuola_di_magia = ScuolaDiMagia::parse(v);
        }

        if let Some(v) = params.get("concentrazione") {
            filter.concentrazione = Some(parse_bool("concentrazione", v)?);
        }
        if let Some(v) = params.get("rituale") {
            filter.rituale = Some(parse_bool("rituale", v)?);
        }

        let componenti = params.all("componenti");
        max_values("componenti", &componenti, MAX_COMPONENTS)?;
        for c in &componenti {
            one_of("componenti", c, Componente::NAMES)?;
            filter.componenti.extend(Componente::parse(c));
        }

        filter.componenti_materiali =
            free_text(&params, "componenti-materiali", MAX_MATERIALS_LEN)?;
        filter.tempo_di_lancio = free_text(&params, "tempo-di-lancio", MAX_TEXT_LEN)?;
        filter.gittata = free_text(&params, "gittata", MAX_TEXT_LEN)?;
        filter.durata = free_text(&params, "durata", MAX_TEXT_LEN)?;

        let classi = params.all("classi");
        max_values("classi", &classi, MAX_CLASSES)?;
        for c in &classi {
            max_chars("classi", c, MAX_CLASS_LEN)?;
        }
        filter.classi = classi;

        Ok(filter)
    }
}

fn free_text(
    params: &QueryParams<'_>,
    name: &str,
    max: usize,
) -> Result<Option<String>, FilterError> {
    match params.get(name) {
        Some(v) => {
            max_chars(name, v, max)?;
            Ok(Some(v.to_string()))
        }
        None => Ok(None),
    }
}

impl FilterSpec for SpellFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut out = self.base.predicates();
        if let Some(l) = self.livello {
            out.push(Predicate::Equals {
                column: "livello",
                value: PgBindValue::Int(l),
            });
        }
        if let Some(s) = self.scuola_di_magia {
            out.push(Predicate::Equals {
                column: "scuola_di_magia",
                value: PgBindValue::Text(s.as_str().to_string()),
            });
        }
        if let Some(b) = self.concentrazione {
            out.push(Predicate::Equals {
                column: "concentrazione",
                value: PgBindValue::Bool(b),
            });
        }
        if let Some(b) = self.rituale {
            out.push(Predicate::Equals {
                column: "rituale",
                value: PgBindValue::Bool(b),
            });
        }
        if !self.componenti.is_empty() {
            out.push(Predicate::ContainsAll {
                column: "componenti",
                values: self.componenti.iter().map(|c| c.as_str().to_string()).collect(),
            });
        }
        let texts = [
            ("componenti_materiali", &self.componenti_materiali),
            ("tempo_di_lancio", &self.tempo_di_lancio),
            ("gittata", &self.gittata),
            ("durata", &self.durata),
        ];
        for (column, value) in texts {
            if let Some(v) = value {
                out.push(Predicate::Contains {
                    column,
                    value: v.clone(),
                });
            }
        }
        for classe in &self.classi {
            out.push(Predicate::Contains {
                column: "classi",
                value: classe.clone(),
            });
        }
        out
    }

    fn sort(&self) -> SortOrder {
        self.base.sort
    }

    fn limit(&self) -> i64 {
        self.base.limit
    }

    fn offset(&self) -> i64 {
        self.base.offset
    }
}
