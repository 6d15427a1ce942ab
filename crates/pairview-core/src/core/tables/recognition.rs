//! Name normalisation and base-recognition tables.
//!
//! Atom and residue names arrive in several historic spellings; everything is
//! folded to one canonical form before any other table is consulted.

use crate::core::models::base::CanonicalBase;
use phf::{Map, Set, phf_map, phf_set};

/// Atom-name aliases folded to their canonical spelling (applied after
/// upper-casing and `*` → `'` substitution).
static ATOM_ALIASES: Map<&'static str, &'static str> = phf_map! {
    "O1'" => "O4'",
    "OL" => "O1P",
    "OR" => "O2P",
    "C5A" => "C5M",
    "O5T" => "O5'",
    "O3T" => "O3'",
};

/// Residue names that map straight to a canonical base letter.
static CANONICAL_RESNAMES: Map<&'static str, char> = phf_map! {
    "A" => 'A', "ADE" => 'A',
    "G" => 'G', "GUA" => 'G',
    "U" => 'U', "URA" => 'U',
    "C" => 'C', "CYT" => 'C',
    "T" => 'T', "THY" => 'T',
    "I" => 'I', "INO" => 'I',
    "P" => 'P', "PSU" => 'P',
};

static WATER_RESNAMES: Set<&'static str> = phf_set! { "HOH", "WAT" };

/// Minimal ring atoms whose presence marks a purine / pyrimidine ring.
pub static PURINE_RING_ATOMS: &[&str] = &["N1", "C2", "N3", "C4", "C5", "C6", "N7", "C8", "N9"];
pub static PYRIMIDINE_RING_ATOMS: &[&str] = &["N1", "C2", "N3", "C4", "C5", "C6"];

/// Sugar atoms taking part in sugar-edge hydrogen bonding.
static SUGAR_HB_ATOMS: Set<&'static str> = phf_set! { "O2'", "O4'", "O3'" };

/// Canonicalise a raw atom name: trim, upper-case, `*` → `'`, fold aliases.
pub fn canonical_atom_name(raw: &str) -> String {
    let mut name = raw.trim().to_ascii_uppercase();
    if name.contains('*') {
        name = name.replace('*', "'");
    }
    match ATOM_ALIASES.get(name.as_str()) {
        Some(alias) => (*alias).to_string(),
        None => name,
    }
}

/// Canonicalise a raw residue name: trim, upper-case, and map the
/// two-letter deoxy forms (`DA`, `DT`, `DG`, `DC`) to the plain base name.
pub fn canonical_residue_name(raw: &str) -> String {
    let name = raw.trim().to_ascii_uppercase();
    if name.len() == 2 && name.starts_with('D') {
        let second = name.chars().nth(1).unwrap_or(' ');
        if matches!(second, 'A' | 'T' | 'G' | 'C') {
            return second.to_string();
        }
    }
    name
}

/// Canonical base for an explicitly named nucleotide residue, if any.
pub fn canonical_base_for_resname(resname: &str) -> Option<CanonicalBase> {
    CANONICAL_RESNAMES
        .get(resname)
        .and_then(|letter| CanonicalBase::from_letter(*letter))
}

pub fn is_water(resname: &str) -> bool {
    WATER_RESNAMES.contains(resname)
}

pub fn is_sugar_hb_atom(name: &str) -> bool {
    SUGAR_HB_ATOMS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_aliases_fold_to_canonical_names() {
        assert_eq!(canonical_atom_name(" C1* "), "C1'");
        assert_eq!(canonical_atom_name("O1'"), "O4'");
        assert_eq!(canonical_atom_name("o1*"), "O4'");
        assert_eq!(canonical_atom_name("OL"), "O1P");
        assert_eq!(canonical_atom_name("OR"), "O2P");
        assert_eq!(canonical_atom_name("C5A"), "C5M");
        assert_eq!(canonical_atom_name("O5T"), "O5'");
        assert_eq!(canonical_atom_name("N9"), "N9");
    }

    #[test]
    fn deoxy_residue_names_map_to_plain_bases() {
        assert_eq!(canonical_residue_name("DA"), "A");
        assert_eq!(canonical_residue_name(" dg"), "G");
        assert_eq!(canonical_residue_name("DU"), "DU");
        assert_eq!(canonical_residue_name("PSU"), "PSU");
    }

    #[test]
    fn canonical_resnames_cover_both_short_and_long_forms() {
        assert_eq!(
            canonical_base_for_resname("GUA"),
            Some(CanonicalBase::Guanine)
        );
        assert_eq!(
            canonical_base_for_resname("P"),
            Some(CanonicalBase::Pseudouridine)
        );
        assert_eq!(canonical_base_for_resname("1MA"), None);
    }

    #[test]
    fn water_is_recognised() {
        assert!(is_water("HOH"));
        assert!(is_water("WAT"));
        assert!(!is_water("G"));
    }
}
