//! Multiplet synthesis: connected components of the pair graph.

use super::records::{BaseIndex, Multiplet, PairRecord};
use crate::core::models::pairing::PairKind;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Enumerate connected components of size ≥ 3 over the `kind = pair`
/// records. Component membership and the canonical `text` form are the
/// regression contract; stacked and unknown records contribute no edges.
#[instrument(skip_all, name = "multiplet_synthesis")]
pub fn derive(records: &[PairRecord]) -> Vec<Multiplet> {
    let mut adjacency: BTreeMap<BaseIndex, Vec<BaseIndex>> = BTreeMap::new();
    for record in records {
        if record.kind != PairKind::Pair {
            continue;
        }
        adjacency.entry(record.i).or_default().push(record.j);
        adjacency.entry(record.j).or_default().push(record.i);
    }

    let mut visited: BTreeSet<BaseIndex> = BTreeSet::new();
    let mut multiplets: Vec<Multiplet> = Vec::new();

    for &start in adjacency.keys() {
        if visited.contains(&start) {
            continue;
        }
        // Iterative DFS keeps the traversal allocation-bounded.
        let mut component: BTreeSet<BaseIndex> = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            component.insert(node);
            if let Some(neighbours) = adjacency.get(&node) {
                stack.extend(neighbours.iter().copied());
            }
        }
        if component.len() < 3 {
            continue;
        }

        let indices: Vec<BaseIndex> = component.into_iter().collect();
        let text = component_text(&indices, records);
        multiplets.push(Multiplet { indices, text });
    }

    multiplets.sort_by(|a, b| a.indices.cmp(&b.indices));
    debug!(multiplets = multiplets.len(), "multiplet synthesis complete");
    multiplets
}

/// Canonical per-edge description: each member edge ascending by `(i, j)`,
/// joined by `" + "`.
fn component_text(indices: &[BaseIndex], records: &[PairRecord]) -> String {
    let members: BTreeSet<BaseIndex> = indices.iter().copied().collect();
    records
        .iter()
        .filter(|record| {
            record.kind == PairKind::Pair
                && members.contains(&record.i)
                && members.contains(&record.j)
        })
        .map(|record| {
            let lw = record
                .lw
                .map(|lw| lw.to_string())
                .unwrap_or_else(|| "?/?".to_string());
            let orientation = record
                .orientation
                .map(|o| o.legacy())
                .unwrap_or("");
            format!(
                "{}_{}: {}-{} ({} {})",
                record.i, record.j, record.base_i, record.base_j, lw, orientation
            )
        })
        .join(" + ")
}
