//! The cheap O(N²) prune: origin distance, plane angle, and in/out-of-plane
//! offsets decide which ordered pairs are worth the expensive predicates.
//! The filter never yields a verdict.

use super::bases::BaseTable;
use super::context::AnalysisContext;
use super::frames::FrameTable;
use super::profile::bump;
use crate::core::tables::thresholds::{CRITERIA, STACK};
use kiddo::{KdTree, SquaredEuclidean};
use tracing::{debug, instrument};

/// A surviving ordered pair `(i, j)` (0-based offsets into the base table),
/// tagged with the band(s) it passed and the geometry the later stages
/// reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub i: usize,
    pub j: usize,
    /// Passed the in-plane pairing band (both frames template-fitted).
    pub pairing: bool,
    /// Passed the stacking band.
    pub stacking: bool,
    pub origin_dist: f64,
    pub plane_angle_deg: f64,
    /// Out-of-plane offsets of the origin separation, one per frame.
    pub vertical_i: f64,
    pub vertical_j: f64,
    /// In-plane offset with respect to frame `i`.
    pub lateral: f64,
}

/// Evaluate the candidate bands for every frame-valid pair within the origin
/// cutoff.
#[instrument(skip_all, name = "candidate_filter")]
pub fn run(ctx: &AnalysisContext<'_>, bases: &BaseTable, frames: &FrameTable) -> Vec<Candidate> {
    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (offset, frame) in frames.frames.iter().enumerate() {
        if let Some(frame) = frame {
            tree.add(&[frame.origin.x, frame.origin.y, frame.origin.z], offset as u64);
        }
    }

    let radius_sq = CRITERIA.origin_dist_max * CRITERIA.origin_dist_max;
    let mut candidates = Vec::new();

    for i in 0..bases.len() {
        let Some(frame_i) = frames.get(i) else {
            continue;
        };
        let neighbours = tree.within_unsorted::<SquaredEuclidean>(
            &[frame_i.origin.x, frame_i.origin.y, frame_i.origin.z],
            radius_sq,
        );
        for neighbour in neighbours {
            let j = neighbour.item as usize;
            if j <= i {
                continue;
            }
            let Some(frame_j) = frames.get(j) else {
                continue;
            };

            let separation = frame_j.origin - frame_i.origin;
            let origin_dist = separation.norm();
            let plane_angle_deg = crate::core::utils::geometry::plane_angle_deg(
                frame_i.normal.as_ref(),
                frame_j.normal.as_ref(),
            );
            let vertical_i = separation.dot(frame_i.normal.as_ref()).abs();
            let vertical_j = separation.dot(frame_j.normal.as_ref()).abs();
            let lateral = (separation - frame_i.normal.as_ref() * separation.dot(frame_i.normal.as_ref())).norm();

            let pairing = !frame_i.fallback
                && !frame_j.fallback
                && plane_angle_deg <= CRITERIA.plane_angle_max_deg
                && vertical_i <= CRITERIA.vertical_dist_max
                && vertical_j <= CRITERIA.vertical_dist_max
                && glyco_n_distance(ctx, bases, i, j)
                    .map_or(true, |d| d >= CRITERIA.glyco_n_dist_min);

            let vertical = vertical_i.min(vertical_j);
            let stacking = plane_angle_deg <= STACK.plane_angle_max_deg
                && vertical >= STACK.vertical_min
                && vertical_i.max(vertical_j) <= STACK.vertical_max
                && lateral <= STACK.lateral_max;

            if pairing || stacking {
                bump(ctx.profile, |p| &p.candidate_pairs);
                candidates.push(Candidate {
                    i,
                    j,
                    pairing,
                    stacking,
                    origin_dist,
                    plane_angle_deg,
                    vertical_i,
                    vertical_j,
                    lateral,
                });
            }
        }
    }

    // The tree hands neighbours back in an arbitrary order; the record set
    // must not depend on it.
    candidates.sort_unstable_by_key(|c| (c.i, c.j));
    debug!(candidates = candidates.len(), "candidate filter complete");
    candidates
}

/// Distance between the glycosidic nitrogens (RN9/YN1) of the two bases;
/// `None` when either atom is missing from the coordinates.
fn glyco_n_distance(
    ctx: &AnalysisContext<'_>,
    bases: &BaseTable,
    i: usize,
    j: usize,
) -> Option<f64> {
    let pos = |offset: usize| {
        let base = &bases.bases[offset];
        let name = if base.code.canonical().is_purine() {
            "N9"
        } else {
            "N1"
        };
        ctx.structure.atom_position(base.residue_index, name)
    };
    Some((pos(i)? - pos(j)?).norm())
}
