//! Global statistics over the finalized record set.

use super::records::{PairRecord, Stats};
use crate::core::models::pairing::{Edge, PairKind};

/// The legacy statistics key for one classified pair. Standard `+/+` and
/// `-/-` records count under `Standard`; everything else keys on the sorted
/// edge-family letters and the orientation (`WW--cis`, `WH-tran`, ...).
/// Unresolved edges keep their `?` so the counts still partition the pair
/// records.
fn type_key(record: &PairRecord) -> Option<String> {
    if record.kind != PairKind::Pair {
        return None;
    }
    let lw = record.lw?;
    if lw.is_standard() {
        return Some("Standard".to_string());
    }
    let orientation = record.orientation?;

    let mut families = [lw.edge_i.family(), lw.edge_j.family()];
    families.sort_by_key(|edge| match edge {
        Edge::WatsonCrick => 0,
        Edge::Hoogsteen => 1,
        Edge::Sugar => 2,
        _ => 3,
    });
    Some(format!(
        "{}{}-{}",
        families[0].code(),
        families[1].code(),
        orientation.stats_key()
    ))
}

/// Aggregate totals and per-type counts. `total_bases` is the recognised
/// base count, not the pair count.
pub fn collect(records: &[PairRecord], total_bases: usize) -> Stats {
    let mut stats = Stats {
        total_bases: total_bases as u64,
        ..Stats::default()
    };
    for record in records {
        if record.kind == PairKind::Pair {
            stats.total_pairs += 1;
        }
        if let Some(key) = type_key(record) {
            *stats.pair_type_counts.entry(key).or_insert(0) += 1;
        }
    }
    stats
}
