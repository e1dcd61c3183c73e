//! Classes, subclasses and the JSON sub-structures stored alongside them.

use serde::{Deserialize, Serialize};

fn is_zero(n: &i32) -> bool {
    *n == 0
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DadoVita {
    D3,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DadoVita {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "d3" => DadoVita::D3,
            "d4" => DadoVita::D4,
            "d6" => DadoVita::D6,
            "d8" => DadoVita::D8,
            "d10" => DadoVita::D10,
            "d12" => DadoVita::D12,
            "d20" => DadoVita::D20,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DadoVita::D3 => "d3",
            DadoVita::D4 => "d4",
            DadoVita::D6 => "d6",
            DadoVita::D8 => "d8",
            DadoVita::D10 => "d10",
            DadoVita::D12 => "d12",
            DadoVita::D20 => "d20",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipoAzione {
    Nessuna,
    #[serde(rename = "Azione Bonus")]
    AzioneBonus,
    Azione,
    Reazione,
    #[serde(rename = "Azione Gratuita")]
    AzioneGratuita,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tratto {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub nome: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub descrizione: String,
    #[serde(rename = "tipo-azione", default, skip_serializing_if = "Option::is_none")]
    pub tipo_azione: Option<TipoAzione>,
    #[serde(rename = "tipo-di-sorgente", default, skip_serializing_if = "String::is_empty")]
    pub tipo_di_sorgente: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SlotIncantesimo {
    #[serde(rename = "numero-slot")]
    pub numero_slot: i32,
    #[serde(rename = "livello-slot-incantesimo")]
    pub livello_slot_incantesimo: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct IncantesimiClasse {
    #[serde(rename = "slot-incantesimi", default, skip_serializing_if = "Vec::is_empty")]
    pub slot_incantesimi: Vec<SlotIncantesimo>,
    #[serde(rename = "incantesimi-preparati", default, skip_serializing_if = "is_zero")]
    pub incantesimi_preparati: i32,
}

/// What a class or subclass gains at one level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProprietaLivello {
    #[serde(rename = "livello-classe")]
    pub livello_classe: i32,
    #[serde(rename = "tratto-di-classe", default, skip_serializing_if = "Option::is_none")]
    pub tratto_di_classe: Option<Tratto>,
    #[serde(rename = "incantesimi-di-classe", default, skip_serializing_if = "Option::is_none")]
    pub incantesimi_di_classe: Option<IncantesimiClasse>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RiferimentoSottoclasse {
    #[serde(rename = "id-sottoclasse")]
    pub id_sottoclasse: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Valuta {
    MR,
    MA,
    ME,
    MO,
    MP,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Importo {
    #[serde(rename = "quantità")]
    pub quantita: i32,
    pub valuta: Valuta,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct OggettoPartenza {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nome: String,
    #[serde(rename = "quantità", default, skip_serializing_if = "is_zero")]
    pub quantita: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EquipaggiamentoPartenza {
    #[serde(rename = "opzione-a", default, skip_serializing_if = "Vec::is_empty")]
    pub opzione_a: Vec<OggettoPartenza>,
    #[serde(rename = "opzione-b", default, skip_serializing_if = "Option::is_none")]
    pub opzione_b: Option<Importo>,
}

impl EquipaggiamentoPartenza {
    pub fn is_empty(&self) -> bool {
        self.opzione_a.is_empty() && self.opzione_b.is_none()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Classe {
    pub id: String,
    pub nome: String,
    /// Empty when the column is null.
    #[serde(default)]
    pub descrizione: String,
    #[serde(rename = "documentazione-di-riferimento")]
    pub documentazione_di_riferimento: String,
    #[serde(rename = "dado-vita")]
    pub dado_vita: DadoVita,
    #[serde(rename = "elenco-sottoclassi", default, skip_serializing_if = "Vec::is_empty")]
    pub elenco_sottoclassi: Vec<RiferimentoSottoclasse>,
    #[serde(
        rename = "equipaggiamento-id-partenza",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub equipaggiamento_partenza: Option<EquipaggiamentoPartenza>,
    #[serde(rename = "proprietà-di-classe", default, skip_serializing_if = "Vec::is_empty")]
    pub proprieta_di_classe: Vec<ProprietaLivello>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SottoClasse {
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub descrizione: String,
    #[serde(rename = "documentazione-di-riferimento")]
    pub documentazione_di_riferimento: String,
    #[serde(rename = "id-classe-associata")]
    pub id_classe_associata: String,
    #[serde(rename = "proprietà-di-sottoclasse", default, skip_serializing_if = "Vec::is_empty")]
    pub proprieta_di_sottoclasse: Vec<ProprietaLivello>,
}
