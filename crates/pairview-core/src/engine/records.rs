use crate::core::models::base::BaseCode;
use crate::core::models::pairing::{LwClass, Orientation, PairKind, Saenger};
use crate::core::models::residue::ResidueId;
use std::collections::BTreeMap;
use std::fmt;

/// 1-based ordinal of a residue within the recognised-base subset, in the
/// order the upstream parser presented the residues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseIndex(pub usize);

impl BaseIndex {
    /// 0-based position into the base table.
    pub fn to_offset(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for BaseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recognised base, as it appears in the output preamble and record
/// identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSummary {
    pub index: BaseIndex,
    pub id: ResidueId,
    pub resname: String,
    pub code: BaseCode,
    pub syn: bool,
}

/// A finalized output entity. Invariants (validated by the reducer):
/// `i < j`; `{i,j}` unique in the set; LW/orientation/Saenger present iff
/// `kind == Pair`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRecord {
    pub i: BaseIndex,
    pub j: BaseIndex,
    pub id_i: ResidueId,
    pub id_j: ResidueId,
    pub base_i: BaseCode,
    pub base_j: BaseCode,
    pub kind: PairKind,
    pub lw: Option<LwClass>,
    pub orientation: Option<Orientation>,
    pub syn_i: bool,
    pub syn_j: bool,
    pub saenger: Option<Saenger>,
    /// Free-form tail: tertiary mark (`!`), bond-composition annotation
    /// (`!(b_s)`, `!1H(b_b)`), or the raw descriptor of an unknown verdict.
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiplet {
    /// Ascending member indices, length ≥ 3.
    pub indices: Vec<BaseIndex>,
    /// Canonical human description; the equivalence key for regression.
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_pairs: u64,
    pub total_bases: u64,
    /// Edge-orientation key → count, legacy key set.
    pub pair_type_counts: BTreeMap<String, u64>,
}

/// The immutable result of one analysis; input to both emitters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRecord {
    pub bases: Vec<BaseSummary>,
    pub base_pairs: Vec<PairRecord>,
    pub multiplets: Vec<Multiplet>,
    pub stats: Stats,
}
