//! Donor/acceptor enumeration with the distance and pseudo-angle gates.

use super::bases::BaseResidue;
use super::context::AnalysisContext;
use super::profile::bump;
use crate::core::tables::hbonds::{DonorAtom, SUGAR_ACCEPTOR, SUGAR_DONOR, acceptors, donors, wc_template, wobble_template};
use crate::core::tables::recognition::is_sugar_hb_atom;
use crate::core::tables::thresholds::{CRITERIA, HB_ANGLE_MIN_DEG};
use crate::core::utils::geometry::angle_deg;
use std::collections::HashSet;

/// One hydrogen bond between the two residues of a candidate pair.
/// Distances are donor-heavy-atom to acceptor.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrogenBond {
    pub donor_atom: String,
    pub acceptor_atom: String,
    /// True when residue `i` of the pair donates.
    pub donor_is_i: bool,
    pub distance: f64,
    pub donor_sugar: bool,
    pub acceptor_sugar: bool,
}

impl HydrogenBond {
    /// Atom name on side `i` / side `j` of the pair.
    pub fn atom_on_i(&self) -> &str {
        if self.donor_is_i {
            &self.donor_atom
        } else {
            &self.acceptor_atom
        }
    }

    pub fn atom_on_j(&self) -> &str {
        if self.donor_is_i {
            &self.acceptor_atom
        } else {
            &self.donor_atom
        }
    }

    /// Sugar participation per side of the pair.
    pub fn sugar_on_i(&self) -> bool {
        if self.donor_is_i {
            self.donor_sugar
        } else {
            self.acceptor_sugar
        }
    }

    pub fn sugar_on_j(&self) -> bool {
        if self.donor_is_i {
            self.acceptor_sugar
        } else {
            self.donor_sugar
        }
    }
}

/// The bond set for one candidate pair with the derived counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HbondSet {
    pub bonds: Vec<HydrogenBond>,
    /// Bonds matching the canonical WC template for the letter pair.
    pub wc_matches: usize,
    /// Bonds matching the G·U wobble template.
    pub wobble_matches: usize,
}

impl HbondSet {
    pub fn total(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}

/// Enumerate hydrogen bonds between the residues of one candidate pair.
pub fn enumerate(
    ctx: &AnalysisContext<'_>,
    base_i: &BaseResidue,
    base_j: &BaseResidue,
) -> HbondSet {
    bump(ctx.profile, |p| &p.hbond_enumerations);

    let mut bonds: Vec<HydrogenBond> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    collect_direction(ctx, base_i, base_j, true, &mut bonds, &mut seen);
    collect_direction(ctx, base_j, base_i, false, &mut bonds, &mut seen);

    let wc_matches = match wc_template(base_i.code.canonical(), base_j.code.canonical()) {
        Some(template) => count_template_matches(&bonds, template),
        None => 0,
    };
    let wobble_matches = match wobble_template(base_i.code.canonical(), base_j.code.canonical()) {
        Some(template) => count_template_matches(&bonds, template),
        None => 0,
    };

    HbondSet {
        bonds,
        wc_matches,
        wobble_matches,
    }
}

fn donor_list(base: &BaseResidue) -> Vec<DonorAtom> {
    let mut list: Vec<DonorAtom> = donors(base.code.canonical()).to_vec();
    list.push(SUGAR_DONOR);
    list
}

fn acceptor_list(base: &BaseResidue) -> Vec<&'static str> {
    let mut list: Vec<&'static str> = acceptors(base.code.canonical()).to_vec();
    list.push(SUGAR_ACCEPTOR);
    list
}

fn collect_direction(
    ctx: &AnalysisContext<'_>,
    donor_base: &BaseResidue,
    acceptor_base: &BaseResidue,
    donor_is_i: bool,
    bonds: &mut Vec<HydrogenBond>,
    seen: &mut HashSet<(String, String)>,
) {
    for donor in donor_list(donor_base) {
        let Some(donor_pos) = ctx
            .structure
            .atom_position(donor_base.residue_index, donor.name)
        else {
            continue;
        };
        let neighbour_pos = ctx
            .structure
            .atom_position(donor_base.residue_index, donor.neighbour);

        for acceptor in acceptor_list(acceptor_base) {
            let Some(acceptor_pos) = ctx
                .structure
                .atom_position(acceptor_base.residue_index, acceptor)
            else {
                continue;
            };

            let distance = (donor_pos - acceptor_pos).norm();
            if distance > CRITERIA.hb_dist_max {
                continue;
            }
            // Pseudo-angle gate, skipped when the covalent neighbour is
            // absent from the coordinates.
            if let Some(neighbour) = neighbour_pos {
                let pseudo = angle_deg(&neighbour, &donor_pos, &acceptor_pos);
                if pseudo < HB_ANGLE_MIN_DEG {
                    continue;
                }
            }

            // One physical contact, one bond: the same unordered atom pair
            // seen from the other direction is dropped.
            let key = if donor_is_i {
                (donor.name.to_string(), acceptor.to_string())
            } else {
                (acceptor.to_string(), donor.name.to_string())
            };
            if !seen.insert(key) {
                continue;
            }

            bonds.push(HydrogenBond {
                donor_atom: donor.name.to_string(),
                acceptor_atom: acceptor.to_string(),
                donor_is_i,
                distance,
                donor_sugar: is_sugar_hb_atom(donor.name),
                acceptor_sugar: is_sugar_hb_atom(acceptor),
            });
        }
    }
}

/// Count template bonds present in the set, matching by atom name per side.
fn count_template_matches(bonds: &[HydrogenBond], template: &[(&str, &str)]) -> usize {
    template
        .iter()
        .filter(|(atom_i, atom_j)| {
            bonds
                .iter()
                .any(|b| b.atom_on_i() == *atom_i && b.atom_on_j() == *atom_j)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::base::CanonicalBase;
    use crate::core::models::structure::StructureBuilder;
    use crate::engine::bases;
    use crate::engine::options::AnalysisOptions;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::testutil::{add_template_base, at_origin, far_away, wc_complement};

    fn bonds_between(
        first: (CanonicalBase, &str),
        second: (CanonicalBase, &str),
        placement: &nalgebra::Isometry3<f64>,
    ) -> HbondSet {
        let mut builder = StructureBuilder::new();
        add_template_base(&mut builder, "A", 1, first.1, first.0, &at_origin());
        add_template_base(&mut builder, "A", 2, second.1, second.0, placement);
        let structure = builder.build();
        let options = AnalysisOptions::default();
        let reporter = ProgressReporter::new();
        let ctx = AnalysisContext::new(&structure, &options, &reporter);
        let table = bases::run(&ctx);
        assert_eq!(table.len(), 2);
        enumerate(&ctx, &table.bases[0], &table.bases[1])
    }

    #[test]
    fn gc_wc_dimer_matches_the_full_three_bond_template() {
        let set = bonds_between(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Cytosine, "C"),
            &wc_complement(),
        );
        assert_eq!(set.wc_matches, 3);
        assert!(set.total() >= 3);
        assert!(set.bonds.iter().all(|b| b.distance <= 3.4));
    }

    #[test]
    fn au_wc_dimer_matches_the_two_bond_template() {
        let set = bonds_between(
            (CanonicalBase::Adenine, "A"),
            (CanonicalBase::Uracil, "U"),
            &wc_complement(),
        );
        assert_eq!(set.wc_matches, 2);
    }

    #[test]
    fn distant_bases_have_no_bonds() {
        let set = bonds_between(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Cytosine, "C"),
            &far_away(40.0),
        );
        assert!(set.is_empty());
        assert_eq!(set.wc_matches, 0);
    }

    #[test]
    fn bond_sides_report_their_atoms() {
        let set = bonds_between(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Cytosine, "C"),
            &wc_complement(),
        );
        let n1n3 = set
            .bonds
            .iter()
            .find(|b| b.atom_on_i() == "N1" && b.atom_on_j() == "N3")
            .expect("N1-N3 bond");
        assert!(n1n3.donor_is_i);
        assert!(!n1n3.sugar_on_i());
        assert!(!n1n3.sugar_on_j());
    }

    #[test]
    fn unordered_duplicates_collapse_to_one_bond() {
        let set = bonds_between(
            (CanonicalBase::Guanine, "G"),
            (CanonicalBase::Cytosine, "C"),
            &wc_complement(),
        );
        for a in &set.bonds {
            let twins = set
                .bonds
                .iter()
                .filter(|b| b.atom_on_i() == a.atom_on_i() && b.atom_on_j() == a.atom_on_j())
                .count();
            assert_eq!(twins, 1);
        }
    }
}
