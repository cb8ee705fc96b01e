use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Success indicator returned by a city deletion.
pub const DELETE_SUCCESS: &str = "Cidade deletada com sucesso";

/// Success message attached to a finished bulk import.
pub const IMPORT_SUCCESS: &str = "Cidades salvas com sucesso";

/// Domain city (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub state_id: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub deleted_at: Option<DateTime<FixedOffset>>,
}

/// Domain state; `initials` is the two-letter region code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: i32,
    pub name: String,
    pub initials: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// Creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub state_id: i32,
}

/// Partial update input; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state_id: Option<i32>,
}

impl CityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.state_id.is_none()
    }
}

/// One entry of the IBGE municipality listing. Only the fields the import reads are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "microrregiao", default)]
    pub microregion: Option<Microregion>,
    #[serde(rename = "regiao-imediata", default)]
    pub immediate_region: Option<ImmediateRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microregion {
    #[serde(rename = "mesorregiao")]
    pub mesoregion: Mesoregion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesoregion {
    #[serde(rename = "UF")]
    pub uf: Uf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmediateRegion {
    #[serde(rename = "regiao-intermediaria")]
    pub intermediate_region: IntermediateRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateRegion {
    #[serde(rename = "UF")]
    pub uf: Uf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uf {
    #[serde(rename = "sigla")]
    pub initials: String,
}

impl Municipality {
    /// Municipality filed under `initials` through the microregion hierarchy.
    pub fn new(id: i64, name: &str, initials: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            microregion: Some(Microregion {
                mesoregion: Mesoregion { uf: Uf { initials: initials.to_string() } },
            }),
            immediate_region: None,
        }
    }

    /// Region code of the owning state. Newer IBGE entries have no microregion,
    /// so the immediate-region hierarchy is consulted as a fallback.
    pub fn uf_initials(&self) -> Option<&str> {
        self.microregion
            .as_ref()
            .map(|m| m.mesoregion.uf.initials.as_str())
            .or_else(|| {
                self.immediate_region
                    .as_ref()
                    .map(|r| r.intermediate_region.uf.initials.as_str())
            })
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub fetched: usize,
    pub created: usize,
    pub duplicates: usize,
    pub unmatched: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IBGE_SAMPLE: &str = r#"[
      {"id":1100015,"nome":"Alta Floresta D'Oeste",
       "microrregiao":{"id":11006,"nome":"Cacoal","mesorregiao":{"id":1102,"nome":"Leste Rondoniense",
         "UF":{"id":11,"sigla":"RO","nome":"Rondônia","regiao":{"id":1,"sigla":"N","nome":"Norte"}}}},
       "regiao-imediata":{"id":110005,"nome":"Cacoal","regiao-intermediaria":{"id":1102,"nome":"Ji-Paraná",
         "UF":{"id":11,"sigla":"RO","nome":"Rondônia","regiao":{"id":1,"sigla":"N","nome":"Norte"}}}}},
      {"id":5101837,"nome":"Boa Esperança do Norte","microrregiao":null,
       "regiao-imediata":{"id":510008,"nome":"Sorriso","regiao-intermediaria":{"id":5104,"nome":"Sinop",
         "UF":{"id":51,"sigla":"MT","nome":"Mato Grosso","regiao":{"id":5,"sigla":"CO","nome":"Centro-Oeste"}}}}}
    ]"#;

    #[test]
    fn decodes_ibge_payload_and_resolves_initials() {
        let list: Vec<Municipality> = serde_json::from_str(IBGE_SAMPLE).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Alta Floresta D'Oeste");
        assert_eq!(list[0].uf_initials(), Some("RO"));
    }

    #[test]
    fn falls_back_to_immediate_region_without_microregion() {
        let list: Vec<Municipality> = serde_json::from_str(IBGE_SAMPLE).unwrap();
        assert!(list[1].microregion.is_none());
        assert_eq!(list[1].uf_initials(), Some("MT"));
    }

    #[test]
    fn no_hierarchy_means_no_initials() {
        let m = Municipality { id: 1, name: "Sem UF".into(), microregion: None, immediate_region: None };
        assert_eq!(m.uf_initials(), None);
    }

    #[test]
    fn patch_deserializes_missing_fields_as_none() {
        let patch: CityPatch = serde_json::from_str(r#"{"name":"Cidade 2"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Cidade 2"));
        assert!(patch.state_id.is_none());
        assert!(!patch.is_empty());
        assert!(CityPatch::default().is_empty());
    }
}
