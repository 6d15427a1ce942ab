//! The schema-v1 structured record.
//!
//! Serialization goes through `serde_json::to_value`, whose map type keeps
//! keys in sorted order, so the byte stream is deterministic: no timestamps,
//! fixed separators, one trailing newline.

use crate::engine::options::AnalysisOptions;
use crate::engine::records::{AnalysisRecord, Multiplet, PairRecord, Stats};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Provenance of the analysed structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub path: String,
    /// `"pdb"` or `"cif"`.
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    pub core: JsonCore,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonCore {
    #[serde(default)]
    pub base_pairs: Vec<JsonBasePair>,
    #[serde(default)]
    pub multiplets: Vec<JsonMultiplet>,
    #[serde(default)]
    pub stats: JsonStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonBasePair {
    pub i: u64,
    pub j: u64,
    pub chain_i: String,
    pub resseq_i: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icode_i: Option<String>,
    pub base_i: String,
    pub base_j: String,
    pub resseq_j: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icode_j: Option<String>,
    pub chain_j: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    pub syn_i: bool,
    pub syn_j: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saenger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonMultiplet {
    pub indices: Vec<u64>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonStats {
    pub total_pairs: u64,
    pub total_bases: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pair_type_counts: BTreeMap<String, u64>,
}

impl From<&PairRecord> for JsonBasePair {
    fn from(record: &PairRecord) -> Self {
        Self {
            i: record.i.0 as u64,
            j: record.j.0 as u64,
            chain_i: record.id_i.chain.clone(),
            resseq_i: record.id_i.resseq,
            icode_i: record.id_i.icode.map(|c| c.to_string()),
            base_i: record.base_i.to_string(),
            base_j: record.base_j.to_string(),
            resseq_j: record.id_j.resseq,
            icode_j: record.id_j.icode.map(|c| c.to_string()),
            chain_j: record.id_j.chain.clone(),
            kind: record.kind.as_str().to_string(),
            lw: record.lw.map(|lw| lw.to_string()),
            orientation: record.orientation.map(|o| o.legacy().to_string()),
            syn_i: record.syn_i,
            syn_j: record.syn_j,
            saenger: record.saenger.map(|s| s.as_str().to_string()),
            note: record.note.clone(),
        }
    }
}

impl From<&Multiplet> for JsonMultiplet {
    fn from(multiplet: &Multiplet) -> Self {
        Self {
            indices: multiplet.indices.iter().map(|i| i.0 as u64).collect(),
            text: multiplet.text.clone(),
        }
    }
}

impl From<&Stats> for JsonStats {
    fn from(stats: &Stats) -> Self {
        Self {
            total_pairs: stats.total_pairs,
            total_bases: stats.total_bases,
            pair_type_counts: stats.pair_type_counts.clone(),
        }
    }
}

/// Recognised options plus the verbatim passthrough of unrecognised ones.
pub fn options_value(options: &AnalysisOptions) -> Value {
    let mut map = Map::new();
    if let Some(filter) = &options.chain_filter {
        map.insert(
            "chain_filter".to_string(),
            Value::Array(filter.iter().map(|c| Value::String(c.clone())).collect()),
        );
    }
    map.insert(
        "cif_ids".to_string(),
        Value::String(options.cif_ids.as_str().to_string()),
    );
    map.insert(
        "nmr_model".to_string(),
        match options.nmr_model {
            Some(model) => Value::from(model),
            None => Value::Null,
        },
    );
    map.insert(
        "chain_id_truncate".to_string(),
        Value::Bool(options.chain_id_truncate),
    );
    map.insert(
        "resolution_max".to_string(),
        match options.resolution_max {
            Some(resolution) => Value::from(resolution),
            None => Value::Null,
        },
    );
    for (key, value) in &options.extra {
        map.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(map)
}

/// Assemble the full document from a finalized record set.
pub fn document(
    record: &AnalysisRecord,
    source: Option<Source>,
    options: &AnalysisOptions,
) -> JsonDocument {
    JsonDocument {
        schema_version: SCHEMA_VERSION,
        source,
        options: Some(options_value(options)),
        core: JsonCore {
            base_pairs: record.base_pairs.iter().map(JsonBasePair::from).collect(),
            multiplets: record.multiplets.iter().map(JsonMultiplet::from).collect(),
            stats: JsonStats::from(&record.stats),
        },
    }
}

/// Deterministic byte form: sorted keys, fixed separators, one trailing
/// newline.
pub fn write_json(document: &JsonDocument) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(document)?;
    Ok(serde_json::to_string(&value)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::base::{BaseCode, CanonicalBase};
    use crate::core::models::pairing::{Edge, LwClass, Orientation, PairKind, Saenger};
    use crate::core::models::residue::ResidueId;
    use crate::engine::records::BaseIndex;

    fn record_with_one_pair() -> AnalysisRecord {
        AnalysisRecord {
            bases: Vec::new(),
            base_pairs: vec![PairRecord {
                i: BaseIndex(1),
                j: BaseIndex(2),
                id_i: ResidueId::new("A", 1),
                id_j: ResidueId::new("A", 2),
                base_i: BaseCode::Canonical(CanonicalBase::Guanine),
                base_j: BaseCode::Modified(CanonicalBase::Cytosine),
                kind: PairKind::Pair,
                lw: Some(LwClass::new(Edge::WatsonCrickPlus, Edge::WatsonCrickPlus)),
                orientation: Some(Orientation::Cis),
                syn_i: false,
                syn_j: true,
                saenger: Some(Saenger::XIX),
                note: None,
            }],
            multiplets: Vec::new(),
            stats: Stats {
                total_pairs: 1,
                total_bases: 2,
                pair_type_counts: [("Standard".to_string(), 1u64)].into_iter().collect(),
            },
        }
    }

    #[test]
    fn document_serializes_with_sorted_keys_and_newline() {
        let doc = document(&record_with_one_pair(), None, &AnalysisOptions::default());
        let text = write_json(&doc).unwrap();
        assert!(text.ends_with('\n'));
        // Sorted top-level keys: core before options before schema_version.
        let core_at = text.find("\"core\"").unwrap();
        let options_at = text.find("\"options\"").unwrap();
        let schema_at = text.find("\"schema_version\"").unwrap();
        assert!(core_at < options_at && options_at < schema_at);
    }

    #[test]
    fn lowercase_letters_round_trip() {
        let doc = document(&record_with_one_pair(), None, &AnalysisOptions::default());
        let text = write_json(&doc).unwrap();
        let parsed: JsonDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.core.base_pairs[0].base_j, "c");
        assert_eq!(parsed.core.base_pairs[0].base_i, "G");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn emitting_twice_is_byte_identical() {
        let doc = document(&record_with_one_pair(), None, &AnalysisOptions::default());
        assert_eq!(write_json(&doc).unwrap(), write_json(&doc).unwrap());
    }

    #[test]
    fn unknown_options_pass_through_verbatim() {
        let mut options = AnalysisOptions::default();
        options
            .extra
            .insert("render_mode".to_string(), Value::String("ps".to_string()));
        let value = options_value(&options);
        assert_eq!(value["render_mode"], Value::String("ps".to_string()));
        assert_eq!(value["chain_id_truncate"], Value::Bool(false));
        assert_eq!(value["nmr_model"], Value::Null);
    }

    #[test]
    fn stacked_records_omit_lw_fields_in_json() {
        let mut record = record_with_one_pair();
        record.base_pairs[0].kind = PairKind::Stacked;
        record.base_pairs[0].lw = None;
        record.base_pairs[0].orientation = None;
        record.base_pairs[0].saenger = None;
        let doc = document(&record, None, &AnalysisOptions::default());
        let text = write_json(&doc).unwrap();
        assert!(!text.contains("\"lw\""));
        assert!(!text.contains("\"saenger\""));
        assert!(text.contains("\"kind\":\"stacked\""));
    }
}
