//! Stacking detection for candidates that failed the pairing predicates.

use super::candidates::Candidate;
use super::context::AnalysisContext;
use super::frames::FrameTable;
use super::profile::bump;
use crate::core::tables::thresholds::STACK;

/// Confirm the stacking geometry of a candidate: near-parallel planes, the
/// inter-plane separation window, and a bounded lateral offset. Disjoint
/// from pairing; the reducer only consults this when no hydrogen-bond
/// verdict exists for the pair.
pub fn is_stacked(ctx: &AnalysisContext<'_>, candidate: &Candidate, frames: &FrameTable) -> bool {
    bump(ctx.profile, |p| &p.stack_checks);

    let (Some(frame_i), Some(frame_j)) = (frames.get(candidate.i), frames.get(candidate.j)) else {
        return false;
    };

    if frame_i.normal.dot(&frame_j.normal).abs() < STACK.plane_angle_max_deg.to_radians().cos() {
        return false;
    }
    let vertical_near = candidate.vertical_i.min(candidate.vertical_j);
    let vertical_far = candidate.vertical_i.max(candidate.vertical_j);
    if vertical_near < STACK.vertical_min || vertical_far > STACK.vertical_max {
        return false;
    }
    candidate.lateral <= STACK.lateral_max
}
