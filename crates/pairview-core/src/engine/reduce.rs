//! Reduction of raw verdicts into the finalized, validated record set.

use super::bases::BaseTable;
use super::classify::PairClass;
use super::context::AnalysisContext;
use super::error::EngineError;
use super::hbonds::HbondSet;
use super::profile::bump;
use super::records::PairRecord;
use crate::core::models::pairing::PairKind;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// One verdict for an ordered candidate, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pair { class: PairClass, bonds: HbondSet },
    Stacked,
    Unknown { descriptor: String },
}

impl Verdict {
    /// Deduplication rank; the hydrogen-bond verdict wins.
    fn rank(&self) -> u8 {
        match self {
            Verdict::Pair { .. } => 2,
            Verdict::Unknown { .. } => 1,
            Verdict::Stacked => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawVerdict {
    /// 0-based offsets into the base table, `i < j`.
    pub i: usize,
    pub j: usize,
    pub verdict: Verdict,
}

/// Deduplicate, run the best-pair pass, attach tertiary marks, sort, and
/// validate the record-set invariants.
#[instrument(skip_all, name = "pair_set_reduction")]
pub fn finalize(
    ctx: &AnalysisContext<'_>,
    bases: &BaseTable,
    verdicts: Vec<RawVerdict>,
) -> Result<Vec<PairRecord>, EngineError> {
    // At most one verdict per {i,j}; higher rank wins.
    let mut chosen: BTreeMap<(usize, usize), RawVerdict> = BTreeMap::new();
    for verdict in verdicts {
        let key = (verdict.i, verdict.j);
        match chosen.get(&key) {
            Some(existing) if existing.verdict.rank() >= verdict.verdict.rank() => {}
            _ => {
                chosen.insert(key, verdict);
            }
        }
    }

    let best = best_pair_offsets(ctx, &chosen);

    let mut records: Vec<PairRecord> = Vec::with_capacity(chosen.len());
    for ((i, j), raw) in &chosen {
        let base_i = &bases.bases[*i];
        let base_j = &bases.bases[*j];
        let mut record = PairRecord {
            i: base_i.index,
            j: base_j.index,
            id_i: base_i.id.clone(),
            id_j: base_j.id.clone(),
            base_i: base_i.code,
            base_j: base_j.code,
            kind: PairKind::Unknown,
            lw: None,
            orientation: None,
            syn_i: base_i.syn,
            syn_j: base_j.syn,
            saenger: None,
            note: None,
        };

        match &raw.verdict {
            Verdict::Pair { class, bonds } => {
                record.kind = PairKind::Pair;
                record.lw = Some(class.lw);
                record.orientation = Some(class.orientation);
                record.saenger = Some(class.saenger);
                // Tertiary: not a best pair and not sequence-adjacent.
                if !best.contains(&(*i, *j)) && j - i > 1 {
                    record.note = Some(tertiary_note(bonds));
                }
            }
            Verdict::Stacked => {
                record.kind = PairKind::Stacked;
            }
            Verdict::Unknown { descriptor } => {
                record.kind = PairKind::Unknown;
                record.note = Some(descriptor.clone());
            }
        }
        records.push(record);
    }

    validate(&records)?;
    debug!(records = records.len(), "pair set finalized");
    Ok(records)
}

/// Greedy best-pair selection: descending bond count, then ascending
/// sequence separation, then ascending offsets; each residue claimed once.
fn best_pair_offsets(
    ctx: &AnalysisContext<'_>,
    chosen: &BTreeMap<(usize, usize), RawVerdict>,
) -> HashSet<(usize, usize)> {
    let mut pairs: Vec<(usize, usize, usize)> = chosen
        .values()
        .filter_map(|raw| match &raw.verdict {
            Verdict::Pair { bonds, .. } => Some((raw.i, raw.j, bonds.total())),
            _ => None,
        })
        .collect();
    pairs.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| (a.1 - a.0).cmp(&(b.1 - b.0)))
            .then_with(|| (a.0, a.1).cmp(&(b.0, b.1)))
    });

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut best: HashSet<(usize, usize)> = HashSet::new();
    for (i, j, _) in pairs {
        bump(ctx.profile, |p| &p.best_pair_checks);
        if claimed.contains(&i) || claimed.contains(&j) {
            continue;
        }
        claimed.insert(i);
        claimed.insert(j);
        best.insert((i, j));
    }
    best
}

/// Tail annotation of a tertiary pair, from the bond composition.
fn tertiary_note(bonds: &HbondSet) -> String {
    let sugar_i = bonds.bonds.iter().any(|b| b.sugar_on_i());
    let sugar_j = bonds.bonds.iter().any(|b| b.sugar_on_j());
    match (sugar_i, sugar_j) {
        (true, true) => "!(s_s)".to_string(),
        (true, false) | (false, true) => "!(b_s)".to_string(),
        (false, false) => {
            if bonds.total() == 1 {
                "!1H(b_b)".to_string()
            } else {
                "!".to_string()
            }
        }
    }
}

/// Record-set invariants; a failure here is a programming error, never
/// retried.
fn validate(records: &[PairRecord]) -> Result<(), EngineError> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for record in records {
        if record.i.0 == 0 || record.j.0 == 0 {
            return Err(EngineError::Internal(format!(
                "unassigned base index in record {}_{}",
                record.i, record.j
            )));
        }
        if record.i >= record.j {
            return Err(EngineError::Internal(format!(
                "record indices out of order: {}_{}",
                record.i, record.j
            )));
        }
        if !seen.insert((record.i.0, record.j.0)) {
            return Err(EngineError::Internal(format!(
                "duplicate record {}_{}",
                record.i, record.j
            )));
        }
        let is_pair = record.kind == PairKind::Pair;
        if is_pair && record.lw.is_none() {
            return Err(EngineError::Internal(format!(
                "pair record {}_{} without an LW class",
                record.i, record.j
            )));
        }
        if !is_pair && (record.lw.is_some() || record.saenger.is_some()) {
            return Err(EngineError::Internal(format!(
                "non-pair record {}_{} carries LW/Saenger fields",
                record.i, record.j
            )));
        }
    }
    Ok(())
}
