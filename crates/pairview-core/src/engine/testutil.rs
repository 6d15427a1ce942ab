//! Helpers for building synthetic structures from the standard-geometry
//! templates. Test-only.

use crate::core::models::atom::Atom;
use crate::core::models::base::CanonicalBase;
use crate::core::models::residue::ResidueId;
use crate::core::models::structure::StructureBuilder;
use crate::core::tables::frames::template_for;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Append a full template base (ring plus exocyclic atoms) to the builder,
/// rigidly transformed.
pub(crate) fn add_template_base(
    builder: &mut StructureBuilder,
    chain: &str,
    resseq: i32,
    resname: &str,
    base: CanonicalBase,
    transform: &Isometry3<f64>,
) {
    let template = template_for(base);
    let id = ResidueId::new(chain, resseq);
    let mut serial = (resseq.unsigned_abs() as usize) * 100;
    for atom in template.ring.iter().chain(template.exocyclic.iter()) {
        serial += 1;
        let p = Point3::new(atom.position[0], atom.position[1], atom.position[2]);
        builder.push_atom(
            id.clone(),
            resname,
            Atom::new(serial, atom.name, transform * p),
        );
    }
}

/// Identity placement.
pub(crate) fn at_origin() -> Isometry3<f64> {
    Isometry3::identity()
}

/// The Watson–Crick complement placement: a half-turn about the pair's long
/// axis, so the complementary base faces the first across the WC edge.
pub(crate) fn wc_complement() -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::identity(),
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
    )
}

/// A stacked placement: one helical rise along the base normal with a small
/// twist about it.
pub(crate) fn stacked_above(rise: f64, twist_deg: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::from(Vector3::new(0.0, 0.0, rise)),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), twist_deg.to_radians()),
    )
}

/// The G·U wobble placement: the complement half-turn plus the in-plane
/// shear that lines up O6···N3 and N1···O2.
pub(crate) fn wobble_shear() -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::from(Vector3::new(2.156, 0.502, 0.0)),
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
    )
}

/// A placement far away from everything else.
pub(crate) fn far_away(offset: f64) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::from(Vector3::new(offset, 0.0, 0.0)), UnitQuaternion::identity())
}
