//! Per-base reference frames by least-squares superposition of the observed
//! ring atoms onto the standard-geometry template for the assigned letter.

use super::bases::{BaseFlags, BaseTable};
use super::context::AnalysisContext;
use crate::core::tables::frames::template_for;
use crate::core::tables::thresholds::FRAME_MIN_ATOMS;
use crate::core::utils::geometry::{plane_fit, superpose};
use nalgebra::{Point3, Unit, Vector3};
use tracing::{debug, instrument};

/// A fitted base frame: origin plus orthonormal in-plane/normal axes.
#[derive(Debug, Clone)]
pub struct Frame {
    pub origin: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
    pub long_axis: Unit<Vector3<f64>>,
    /// Fit RMSD over the matched ring atoms; 0.0 for the centroid fallback.
    pub rmsd: f64,
    /// Built from the centroid fallback; such a base cannot pair but may
    /// still stack.
    pub fallback: bool,
}

/// Frames parallel to the base table. `None` means not even the fallback was
/// possible; the base is inert.
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    pub frames: Vec<Option<Frame>>,
}

impl FrameTable {
    pub fn get(&self, offset: usize) -> Option<&Frame> {
        self.frames.get(offset).and_then(|f| f.as_ref())
    }
}

/// Fit a frame for every recognised base, flagging fit failures on the base
/// table.
#[instrument(skip_all, name = "frame_fitting")]
pub fn run(ctx: &AnalysisContext<'_>, bases: &mut BaseTable) -> FrameTable {
    let mut frames = Vec::with_capacity(bases.len());

    for base in bases.bases.iter_mut() {
        let template = template_for(base.code.canonical());

        let mut template_points: Vec<Point3<f64>> = Vec::with_capacity(template.ring.len());
        let mut observed_points: Vec<Point3<f64>> = Vec::with_capacity(template.ring.len());
        for template_atom in template.ring {
            if let Some(observed) = ctx
                .structure
                .atom_position(base.residue_index, template_atom.name)
            {
                template_points.push(Point3::new(
                    template_atom.position[0],
                    template_atom.position[1],
                    template_atom.position[2],
                ));
                observed_points.push(observed);
            }
        }

        let fitted = if template_points.len() >= FRAME_MIN_ATOMS {
            superpose(&template_points, &observed_points)
        } else {
            None
        };

        let frame = match fitted {
            Some(fit) => {
                let normal = fit.apply_vector(&Vector3::from(template.normal));
                let long_axis = fit.apply_vector(&Vector3::from(template.long_axis));
                Some(Frame {
                    origin: fit.apply(&Point3::origin()),
                    normal: Unit::new_normalize(normal),
                    long_axis: Unit::new_normalize(long_axis),
                    rmsd: fit.rmsd,
                    fallback: false,
                })
            }
            None => {
                base.flags |= BaseFlags::FRAME_INVALID;
                debug!(residue = %base.id, "frame fit failed, trying centroid fallback");
                plane_fit(&observed_points).map(|(center, normal)| Frame {
                    origin: center,
                    normal,
                    long_axis: Unit::new_normalize(orthogonal_to(&normal)),
                    rmsd: 0.0,
                    fallback: true,
                })
            }
        };
        frames.push(frame);
    }

    FrameTable { frames }
}

/// Any unit vector orthogonal to `n`, for the fallback's arbitrary in-plane
/// axis.
fn orthogonal_to(n: &Unit<Vector3<f64>>) -> Vector3<f64> {
    let candidate = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    candidate - n.as_ref() * candidate.dot(n)
}
