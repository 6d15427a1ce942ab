//! Leontis–Westhof classification of a hydrogen-bonded candidate.

use super::bases::BaseResidue;
use super::context::AnalysisContext;
use super::frames::Frame;
use super::hbonds::HbondSet;
use super::profile::bump;
use crate::core::models::base::CanonicalBase;
use crate::core::models::pairing::{Edge, LwClass, Orientation, Saenger};
use crate::core::tables::edges::{EDGE_PRIORITY, edge_atoms};
use crate::core::tables::hbonds::{saenger_for, wc_template, wobble_template};
use crate::core::utils::geometry::dihedral_deg;
use nalgebra::Point3;

/// A classified pair verdict, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct PairClass {
    pub lw: LwClass,
    pub orientation: Orientation,
    pub saenger: Saenger,
}

/// Classify one bonded candidate. `None` when neither residue exposes a
/// recognised edge (the ambiguous-pair case).
pub fn classify(
    ctx: &AnalysisContext<'_>,
    base_i: &BaseResidue,
    base_j: &BaseResidue,
    frame_i: &Frame,
    frame_j: &Frame,
    bonds: &HbondSet,
) -> Option<PairClass> {
    bump(ctx.profile, |p| &p.lw_classifications);

    let edge_i = dominant_edge(base_i, bonds, Side::I);
    let edge_j = dominant_edge(base_j, bonds, Side::J);
    if edge_i == Edge::Unresolved && edge_j == Edge::Unresolved {
        return None;
    }

    let orientation = orientation_of(ctx, base_i, base_j, frame_i, frame_j);

    // Watson-Crick sub-classification.
    let both_wc = edge_i.family() == Edge::WatsonCrick && edge_j.family() == Edge::WatsonCrick;
    if both_wc {
        if let Some(template) = wc_template(base_i.code.canonical(), base_j.code.canonical()) {
            if bonds.wc_matches == template.len() {
                let polarity = standard_polarity(base_i.code.canonical(), base_j.code.canonical());
                return Some(PairClass {
                    lw: LwClass::new(polarity, polarity),
                    orientation,
                    saenger: saenger_for(
                        base_i.code.canonical(),
                        base_j.code.canonical(),
                        orientation,
                    ),
                });
            }
        }
        if let Some(template) = wobble_template(base_i.code.canonical(), base_j.code.canonical()) {
            if bonds.wobble_matches == template.len() {
                return Some(PairClass {
                    lw: LwClass::new(Edge::WatsonCrick, Edge::WatsonCrick),
                    orientation,
                    saenger: saenger_for(
                        base_i.code.canonical(),
                        base_j.code.canonical(),
                        orientation,
                    ),
                });
            }
        }
    }

    Some(PairClass {
        lw: LwClass::new(edge_i, edge_j),
        orientation,
        saenger: Saenger::NotApplicable,
    })
}

/// Polarity letter of a fully canonical pair: `+` for the three-bond G-C
/// family, `-` for the two-bond A-U/A-T family.
fn standard_polarity(base_i: CanonicalBase, base_j: CanonicalBase) -> Edge {
    use CanonicalBase::*;
    match (base_i, base_j) {
        (Guanine, Cytosine)
        | (Cytosine, Guanine)
        | (Inosine, Cytosine)
        | (Cytosine, Inosine) => Edge::WatsonCrickPlus,
        _ => Edge::WatsonCrickMinus,
    }
}

enum Side {
    I,
    J,
}

/// Tally edge participation of the bonds on one side and pick the dominant
/// edge, ties breaking W > H > S.
fn dominant_edge(base: &BaseResidue, bonds: &HbondSet, side: Side) -> Edge {
    let mut best = Edge::Unresolved;
    let mut best_count = 0usize;

    for edge in EDGE_PRIORITY {
        let members = edge_atoms(base.code.canonical(), edge);
        let count = bonds
            .bonds
            .iter()
            .filter(|bond| {
                let atom = match side {
                    Side::I => bond.atom_on_i(),
                    Side::J => bond.atom_on_j(),
                };
                members.contains(&atom)
            })
            .count();
        if count > best_count {
            best = edge;
            best_count = count;
        }
    }
    best
}

/// Relative orientation from the glycosidic-bond dihedral
/// C1'(i)-N(i)-N(j)-C1'(j); cis iff the magnitude stays below 90°. Falls
/// back to the frame-normal dot product when the torsion atoms are missing.
fn orientation_of(
    ctx: &AnalysisContext<'_>,
    base_i: &BaseResidue,
    base_j: &BaseResidue,
    frame_i: &Frame,
    frame_j: &Frame,
) -> Orientation {
    match glycosidic_points(ctx, base_i).zip(glycosidic_points(ctx, base_j)) {
        Some(((c1_i, n_i), (c1_j, n_j))) => {
            let chi = dihedral_deg(&c1_i, &n_i, &n_j, &c1_j);
            if chi.abs() < 90.0 {
                Orientation::Cis
            } else {
                Orientation::Trans
            }
        }
        None => {
            if frame_i.normal.dot(&frame_j.normal) > 0.0 {
                Orientation::Cis
            } else {
                Orientation::Trans
            }
        }
    }
}

fn glycosidic_points(
    ctx: &AnalysisContext<'_>,
    base: &BaseResidue,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let glyco_n = if base.code.canonical().is_purine() {
        "N9"
    } else {
        "N1"
    };
    let c1 = ctx.structure.atom_position(base.residue_index, "C1'")?;
    let n = ctx.structure.atom_position(base.residue_index, glyco_n)?;
    Some((c1, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::StructureBuilder;
    use crate::engine::options::AnalysisOptions;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::testutil::{add_template_base, at_origin, wc_complement, wobble_shear};
    use crate::engine::{bases, frames, hbonds};
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
    use std::f64::consts::PI;

    fn classify_dimer(
        first: (CanonicalBase, &str),
        second: (CanonicalBase, &str),
        placement: &Isometry3<f64>,
    ) -> Option<PairClass> {
        let mut builder = StructureBuilder::new();
        add_template_base(&mut builder, "A", 1, first.1, first.0, &at_origin());
        add_template_base(&mut builder, "A", 2, second.1, second.0, placement);
        let structure = builder.build();
        let options = AnalysisOptions::default();
        let reporter = ProgressReporter::new();
        let ctx = AnalysisContext::new(&structure, &options, &reporter);
        let mut table = bases::run(&ctx);
        let frame_table = frames::run(&ctx, &mut table);
        let set = hbonds::enumerate(&ctx, &table.bases[0], &table.bases[1]);
        classify(
            &ctx,
            &table.bases[0],
            &table.bases[1],
            frame_table.get(0).unwrap(),
            frame_table.get(1).unwrap(),
            &set,
        )
    }

    #[test]
    fn canonical_gc_is_standard_plus_cis_xix() {
        let class = classify_dimer(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Cytosine, "C"),
            &wc_complement(),
        )
        .unwrap();
        assert_eq!(class.lw.to_string(), "+/+");
        assert_eq!(class.orientation, Orientation::Cis);
        assert_eq!(class.saenger, Saenger::XIX);
    }

    #[test]
    fn canonical_au_is_standard_minus_cis_xx() {
        let class = classify_dimer(
            (CanonicalBase::Adenine, "A"),
            (CanonicalBase::Uracil, "U"),
            &wc_complement(),
        )
        .unwrap();
        assert_eq!(class.lw.to_string(), "-/-");
        assert_eq!(class.orientation, Orientation::Cis);
        assert_eq!(class.saenger, Saenger::XX);
    }

    #[test]
    fn gu_wobble_is_ww_cis_xxviii() {
        let class = classify_dimer(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Uracil, "U"),
            &wobble_shear(),
        )
        .unwrap();
        assert_eq!(class.lw.to_string(), "W/W");
        assert_eq!(class.orientation, Orientation::Cis);
        assert_eq!(class.saenger, Saenger::XXVIII);
    }

    #[test]
    fn partial_reverse_wc_is_ww_trans_na() {
        // A half-turn about z (no flip) leaves one N1-N3 contact with the
        // glycosidic bonds on opposite sides.
        let placement = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI),
        );
        let class = classify_dimer(
            (CanonicalBase::Adenine, "A"),
            (CanonicalBase::Uracil, "U"),
            &placement,
        )
        .unwrap();
        assert_eq!(class.lw.to_string(), "W/W");
        assert_eq!(class.orientation, Orientation::Trans);
        assert_eq!(class.saenger, Saenger::NotApplicable);
    }
}
