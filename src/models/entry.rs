//! The plain reference entry shared by backgrounds, conditions, feats and the other simple resources.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Voce {
    pub id: String,
    pub nome: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub descrizione: String,
    #[serde(rename = "documentazione-di-riferimento")]
    pub documentazione_di_riferimento: String,
}
