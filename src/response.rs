//! Response envelopes.

use crate::filter::page_number;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// `{"pagina": n, "numero-di-elementi": total, "<key>": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub pagina: i64,
    pub numero_di_elementi: i64,
    /// Resource-specific key of the item array.
    pub key: &'static str,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(key: &'static str, limit: i64, offset: i64, total: i64, items: Vec<T>) -> Self {
        Paginated {
            pagina: page_number(limit, offset),
            numero_di_elementi: total,
            key,
            items,
        }
    }
}

impl<T: Serialize> Serialize for Paginated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("pagina", &self.pagina)?;
        map.serialize_entry("numero-di-elementi", &self.numero_di_elementi)?;
        map.serialize_entry(self.key, &self.items)?;
        map.end()
    }
}
