//! Typed list filters parsed from query-string pairs.

mod list;
mod spell;
pub mod validation;

pub use list::*;
pub use spell::*;

use crate::sql::Predicate;

/// What the query builder needs from a parsed filter.
pub trait FilterSpec {
    /// Conditions ANDed onto the base predicate, in order.
    fn predicates(&self) -> Vec<Predicate>;
    fn sort(&self) -> SortOrder;
    fn limit(&self) -> i64;
    fn offset(&self) -> i64;
}

/// Ordered view over decoded query pairs. Keys may repeat.
pub struct QueryParams<'a> {
    pairs: &'a [(String, String)],
}

impl<'a> QueryParams<'a> {
    pub fn new(pairs: &'a [(String, String)]) -> Self {
        QueryParams { pairs }
    }

    /// First value for `key`. An empty value counts as absent.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Every value given for `key`, in request order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}
