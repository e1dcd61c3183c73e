//! Spells.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScuolaDiMagia {
    Abiurazione,
    Divinazione,
    Evocazione,
    Invocazione,
    Necromamzia,
    Illusione,
    Transmutazione,
    Incantamento,
}

impl ScuolaDiMagia {
    pub const ALL: [ScuolaDiMagia; 8] = [
        ScuolaDiMagia::Abiurazione,
        ScuolaDiMagia::Divinazione,
        ScuolaDiMagia::Evocazione,
        ScuolaDiMagia::Invocazione,
        ScuolaDiMagia::Necromamzia,
        ScuolaDiMagia::Illusione,
        ScuolaDiMagia::Transmutazione,
        ScuolaDiMagia::Incantamento,
    ];

    pub const NAMES: &'static [&'static str] = &[
        "Abiurazione",
        "Divinazione",
        "Evocazione",
        "Invocazione",
        "Necromamzia",
        "Illusione",
        "Transmutazione",
        "Incantamento",
    ];

    pub fn as_str(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Verbal, somatic or material component.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Componente {
    #[serde(rename = "V")]
    Verbale,
    #[serde(rename = "S")]
    Somatica,
    #[serde(rename = "M")]
    Materiale,
}

impl Componente {
    pub const NAMES: &'static [&'static str] = &["V", "S", "M"];

    pub fn as_str(self) -> &'static str {
        match self {
            Componente::Verbale => "V",
            Componente::Somatica => "S",
            Componente::Materiale => "M",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "V" => Some(Componente::Verbale),
            "S" => Some(Componente::Somatica),
            "M" => Some(Componente::Materiale),
            _ => None,
        }
    }
}

/// `effetto` is kept as stored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EffettoIncantesimo {
    #[serde(rename = "ripetizione-effetto", default, skip_serializing_if = "Option::is_none")]
    pub ripetizione_effetto: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effetto: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Incantesimo {
    pub id: String,
    pub nome: String,
    pub livello: i32,
    #[serde(rename = "scuola-di-magia")]
    pub scuola_di_magia: ScuolaDiMagia,
    #[serde(rename = "tempo-di-lancio")]
    pub tempo_di_lancio: String,
    pub gittata: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub concentrazione: bool,
    #[serde(rename = "sempre-preparato")]
    pub sempre_preparato: bool,
    pub rituale: bool,
    #[serde(rename = "effetto-incantesimo", default, skip_serializing_if = "Option::is_none")]
    pub effetto_incantesimo: Option<EffettoIncantesimo>,
    pub componenti: Vec<Componente>,
    #[serde(rename = "componenti-materiali", default, skip_serializing_if = "Option::is_none")]
    pub componenti_materiali: Option<String>,
    pub durata: String,
    pub descrizione: String,
    #[serde(
        rename = "effetto-livello-maggiore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub effetto_livello_maggiore: Option<EffettoIncantesimo>,
    /// Class names as free text, e.g. "Mago, Stregone".
    pub classi: String,
    #[serde(rename = "documentazione-di-riferimento")]
    pub documentazione_di_riferimento: String,
}
