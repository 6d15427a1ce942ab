use crate::core::io::mmcif::IdScheme;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Recognised analysis options.
///
/// Options the engine does not recognise are preserved verbatim in `extra`
/// and surface unchanged in the JSON record; they never alter behaviour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
    /// Restrict the analysis to residues whose chain identifier is in the
    /// set. Filtered residues receive no BaseIndex.
    pub chain_filter: Option<BTreeSet<String>>,
    /// Identifier scheme used by the mmCIF reader (recorded here so the
    /// JSON record reflects what upstream did).
    pub cif_ids: IdScheme,
    /// NMR model selection; `None` means model 1.
    pub nmr_model: Option<usize>,
    /// Legacy compatibility: truncate chain identifiers to one character
    /// before indexing.
    pub chain_id_truncate: bool,
    /// Upstream resolution filter; recorded only.
    pub resolution_max: Option<f64>,
    /// Unrecognised options, passed through verbatim.
    pub extra: BTreeMap<String, Value>,
}

impl AnalysisOptions {
    /// True when the chain passes the (optional) chain filter.
    pub fn admits_chain(&self, chain: &str) -> bool {
        match &self.chain_filter {
            Some(set) => set.contains(chain),
            None => true,
        }
    }
}
