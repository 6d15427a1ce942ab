//! Optional instrumentation counters.
//!
//! The legacy tool kept these in process-wide globals; here they are a plain
//! value owned by the caller and threaded through the context by reference.
//! When no sink is attached the engine pays one branch per bump.

use std::cell::Cell;

/// Counters over one analysis. Interior mutability keeps the context shared
/// by immutable reference; the engine is single-threaded per structure.
#[derive(Debug, Default)]
pub struct AnalysisProfile {
    pub candidate_pairs: Cell<u64>,
    pub pair_checks: Cell<u64>,
    pub stack_checks: Cell<u64>,
    pub hbond_enumerations: Cell<u64>,
    pub lw_classifications: Cell<u64>,
    pub best_pair_checks: Cell<u64>,
    pub skipped_residues: Cell<u64>,
}

impl AnalysisProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain-value snapshot for logging or serialization by the caller.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            candidate_pairs: self.candidate_pairs.get(),
            pair_checks: self.pair_checks.get(),
            stack_checks: self.stack_checks.get(),
            hbond_enumerations: self.hbond_enumerations.get(),
            lw_classifications: self.lw_classifications.get(),
            best_pair_checks: self.best_pair_checks.get(),
            skipped_residues: self.skipped_residues.get(),
        }
    }
}

pub(crate) fn bump(counter: Option<&AnalysisProfile>, field: fn(&AnalysisProfile) -> &Cell<u64>) {
    if let Some(profile) = counter {
        let cell = field(profile);
        cell.set(cell.get() + 1);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub candidate_pairs: u64,
    pub pair_checks: u64,
    pub stack_checks: u64,
    pub hbond_enumerations: u64,
    pub lw_classifications: u64,
    pub best_pair_checks: u64,
    pub skipped_residues: u64,
}
