//! Donor/acceptor tables, canonical Watson–Crick bond templates, and the
//! Saenger correspondence.

use crate::core::models::base::CanonicalBase;
use crate::core::models::pairing::{Orientation, Saenger};

/// A donor atom together with the covalent neighbour used for the
/// pseudo-angle gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonorAtom {
    pub name: &'static str,
    pub neighbour: &'static str,
}

const fn donor(name: &'static str, neighbour: &'static str) -> DonorAtom {
    DonorAtom { name, neighbour }
}

/// The ribose 2'-hydroxyl acts as donor and acceptor on every base.
pub const SUGAR_DONOR: DonorAtom = donor("O2'", "C2'");
pub const SUGAR_ACCEPTOR: &str = "O2'";

/// Base-side donor atoms, keyed by canonical letter.
pub fn donors(base: CanonicalBase) -> &'static [DonorAtom] {
    match base {
        CanonicalBase::Adenine => &const { [donor("N6", "C6")] },
        CanonicalBase::Guanine => &const { [donor("N1", "C2"), donor("N2", "C2")] },
        CanonicalBase::Cytosine => &const { [donor("N4", "C4")] },
        CanonicalBase::Uracil | CanonicalBase::Thymine => &const { [donor("N3", "C2")] },
        CanonicalBase::Inosine => &const { [donor("N1", "C2")] },
        CanonicalBase::Pseudouridine => &const { [donor("N1", "C6"), donor("N3", "C2")] },
    }
}

/// Base-side acceptor atoms, keyed by canonical letter.
pub fn acceptors(base: CanonicalBase) -> &'static [&'static str] {
    match base {
        CanonicalBase::Adenine => &["N1", "N3", "N7"],
        CanonicalBase::Guanine => &["O6", "N3", "N7"],
        CanonicalBase::Cytosine => &["N3", "O2"],
        CanonicalBase::Uracil | CanonicalBase::Thymine => &["O2", "O4"],
        CanonicalBase::Inosine => &["O6", "N3", "N7"],
        CanonicalBase::Pseudouridine => &["O2", "O4"],
    }
}

/// One bond of a canonical template: `(atom on base i, atom on base j)`.
pub type TemplateBond = (&'static str, &'static str);

/// The full Watson–Crick bond template for a letter pair, if the pair has
/// one. Order of the tuple follows the order of the arguments.
pub fn wc_template(
    base_i: CanonicalBase,
    base_j: CanonicalBase,
) -> Option<&'static [TemplateBond]> {
    use CanonicalBase::*;
    match (base_i, base_j) {
        (Guanine, Cytosine) => Some(&[("O6", "N4"), ("N1", "N3"), ("N2", "O2")]),
        (Cytosine, Guanine) => Some(&[("N4", "O6"), ("N3", "N1"), ("O2", "N2")]),
        (Adenine, Uracil) | (Adenine, Thymine) => Some(&[("N6", "O4"), ("N1", "N3")]),
        (Uracil, Adenine) | (Thymine, Adenine) => Some(&[("O4", "N6"), ("N3", "N1")]),
        (Inosine, Cytosine) => Some(&[("O6", "N4"), ("N1", "N3")]),
        (Cytosine, Inosine) => Some(&[("N4", "O6"), ("N3", "N1")]),
        _ => None,
    }
}

/// The G·U wobble bond template, consulted when the full WC template is
/// absent or only partially matched.
pub fn wobble_template(
    base_i: CanonicalBase,
    base_j: CanonicalBase,
) -> Option<&'static [TemplateBond]> {
    use CanonicalBase::*;
    match (base_i, base_j) {
        (Guanine, Uracil) => Some(&[("O6", "N3"), ("N1", "O2")]),
        (Uracil, Guanine) => Some(&[("N3", "O6"), ("O2", "N1")]),
        _ => None,
    }
}

/// Saenger class for a classified canonical pair.
pub fn saenger_for(
    base_i: CanonicalBase,
    base_j: CanonicalBase,
    orientation: Orientation,
) -> Saenger {
    use CanonicalBase::*;
    match (base_i, base_j, orientation) {
        (Guanine, Cytosine, Orientation::Cis)
        | (Cytosine, Guanine, Orientation::Cis)
        | (Inosine, Cytosine, Orientation::Cis)
        | (Cytosine, Inosine, Orientation::Cis) => Saenger::XIX,
        (Guanine, Cytosine, Orientation::Trans) | (Cytosine, Guanine, Orientation::Trans) => {
            Saenger::XXII
        }
        (Adenine, Uracil, Orientation::Cis)
        | (Uracil, Adenine, Orientation::Cis)
        | (Adenine, Thymine, Orientation::Cis)
        | (Thymine, Adenine, Orientation::Cis) => Saenger::XX,
        (Adenine, Uracil, Orientation::Trans)
        | (Uracil, Adenine, Orientation::Trans)
        | (Adenine, Thymine, Orientation::Trans)
        | (Thymine, Adenine, Orientation::Trans) => Saenger::XXI,
        (Guanine, Uracil, Orientation::Cis) | (Uracil, Guanine, Orientation::Cis) => {
            Saenger::XXVIII
        }
        _ => Saenger::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_template_has_three_bonds_and_flips_with_argument_order() {
        let gc = wc_template(CanonicalBase::Guanine, CanonicalBase::Cytosine).unwrap();
        assert_eq!(gc.len(), 3);
        let cg = wc_template(CanonicalBase::Cytosine, CanonicalBase::Guanine).unwrap();
        assert_eq!(cg[0], ("N4", "O6"));
        assert_eq!(gc[0], ("O6", "N4"));
    }

    #[test]
    fn au_and_at_share_the_two_bond_template() {
        let au = wc_template(CanonicalBase::Adenine, CanonicalBase::Uracil).unwrap();
        let at = wc_template(CanonicalBase::Adenine, CanonicalBase::Thymine).unwrap();
        assert_eq!(au, at);
        assert_eq!(au.len(), 2);
    }

    #[test]
    fn gg_has_no_wc_template() {
        assert!(wc_template(CanonicalBase::Guanine, CanonicalBase::Guanine).is_none());
    }

    #[test]
    fn wobble_exists_only_for_gu() {
        assert!(wobble_template(CanonicalBase::Guanine, CanonicalBase::Uracil).is_some());
        assert!(wobble_template(CanonicalBase::Uracil, CanonicalBase::Guanine).is_some());
        assert!(wobble_template(CanonicalBase::Guanine, CanonicalBase::Thymine).is_none());
    }

    #[test]
    fn saenger_lookup_covers_the_canonical_set() {
        assert_eq!(
            saenger_for(CanonicalBase::Guanine, CanonicalBase::Cytosine, Orientation::Cis),
            Saenger::XIX
        );
        assert_eq!(
            saenger_for(CanonicalBase::Uracil, CanonicalBase::Adenine, Orientation::Cis),
            Saenger::XX
        );
        assert_eq!(
            saenger_for(CanonicalBase::Adenine, CanonicalBase::Uracil, Orientation::Trans),
            Saenger::XXI
        );
        assert_eq!(
            saenger_for(CanonicalBase::Guanine, CanonicalBase::Uracil, Orientation::Cis),
            Saenger::XXVIII
        );
        assert_eq!(
            saenger_for(CanonicalBase::Guanine, CanonicalBase::Guanine, Orientation::Cis),
            Saenger::NotApplicable
        );
    }

    #[test]
    fn every_donor_has_a_ring_neighbour() {
        for base in [
            CanonicalBase::Adenine,
            CanonicalBase::Guanine,
            CanonicalBase::Cytosine,
            CanonicalBase::Uracil,
            CanonicalBase::Thymine,
            CanonicalBase::Inosine,
            CanonicalBase::Pseudouridine,
        ] {
            for donor in donors(base) {
                assert!(!donor.neighbour.is_empty());
            }
        }
    }
}
