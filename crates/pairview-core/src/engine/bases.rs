//! Base recognition and letter assignment.
//!
//! Maps each residue of the structure to a single-letter base code, or skips
//! it. Recognition is geometric first (the ring criterion), nominal second
//! (the canonical residue-name table); letters for unnamed rings come from
//! the atom-presence heuristic. Residues surviving recognition receive their
//! 1-based BaseIndex in presentation order.

use super::context::AnalysisContext;
use super::profile::bump;
use super::records::{BaseIndex, BaseSummary};
use crate::core::models::base::{BaseCode, CanonicalBase};
use crate::core::models::residue::ResidueId;
use crate::core::tables::recognition::{canonical_base_for_resname, is_water};
use crate::core::tables::thresholds::{
    AMINO_CA_C_MAX, PURINE_N1_N9_MAX, PURINE_N1_N9_MIN, RING_BOND_MAX, RING_DIAG_MAX,
    SYN_CHI_MAX_DEG, SYN_CHI_MIN_DEG,
};
use crate::core::utils::geometry::dihedral_deg;
use bitflags::bitflags;
use tracing::{debug, instrument};

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BaseFlags: u8 {
        /// Letter assigned by the atom-presence heuristic (lowercase form).
        const MODIFIED = 0b0000_0001;
        /// Reference-frame fit failed; only the stacking fallback applies.
        const FRAME_INVALID = 0b0000_0010;
    }
}

/// Ring classification of one residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingClass {
    Purine,
    Pyrimidine,
    AminoAcid,
    NotABase,
}

/// One recognised base, carrying everything later stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseResidue {
    /// Index into `structure.residues()`.
    pub residue_index: usize,
    pub index: BaseIndex,
    /// Identity after chain truncation (when enabled).
    pub id: ResidueId,
    pub resname: String,
    pub code: BaseCode,
    pub ring: RingClass,
    pub syn: bool,
    pub flags: BaseFlags,
}

impl BaseResidue {
    pub fn summary(&self) -> BaseSummary {
        BaseSummary {
            index: self.index,
            id: self.id.clone(),
            resname: self.resname.clone(),
            code: self.code,
            syn: self.syn,
        }
    }
}

/// The recognised-base subset in presentation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseTable {
    pub bases: Vec<BaseResidue>,
}

impl BaseTable {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Geometric ring classification (the legacy identity test): the N1-C2/N1-C6
/// legs and the C2-C6 diagonal bound a six-ring; an N1-N9 distance in the
/// purine window upgrades it; a short CA-C contact flags an amino acid.
pub fn ring_class(ctx: &AnalysisContext<'_>, residue_index: usize) -> RingClass {
    let n1 = ctx.structure.atom_position(residue_index, "N1");
    let c2 = ctx.structure.atom_position(residue_index, "C2");
    let c6 = ctx.structure.atom_position(residue_index, "C6");

    if let (Some(n1), Some(c2), Some(c6)) = (n1, c2, c6) {
        let leg_a = (n1 - c2).norm();
        let leg_b = (n1 - c6).norm();
        let diagonal = (c2 - c6).norm();
        if leg_a <= RING_BOND_MAX && leg_b <= RING_BOND_MAX && diagonal <= RING_DIAG_MAX {
            if let Some(n9) = ctx.structure.atom_position(residue_index, "N9") {
                let span = (n1 - n9).norm();
                if (PURINE_N1_N9_MIN..=PURINE_N1_N9_MAX).contains(&span) {
                    return RingClass::Purine;
                }
            }
            return RingClass::Pyrimidine;
        }
        return RingClass::NotABase;
    }

    let ca = ctx.structure.atom_position(residue_index, "CA");
    let c = ctx
        .structure
        .atom_position(residue_index, "C")
        .or_else(|| ctx.structure.atom_position(residue_index, "N"));
    if let (Some(ca), Some(c)) = (ca, c) {
        if (ca - c).norm() <= AMINO_CA_C_MAX {
            return RingClass::AminoAcid;
        }
    }
    RingClass::NotABase
}

/// The atom-presence heuristic for rings without a canonical residue name.
/// Fixed priority; `None` when the ring resists every template.
fn heuristic_letter(ctx: &AnalysisContext<'_>, residue_index: usize, ring: RingClass) -> Option<CanonicalBase> {
    match ring {
        RingClass::Purine => {
            if ctx.structure.has_atom(residue_index, "N2") {
                Some(CanonicalBase::Guanine)
            } else {
                Some(CanonicalBase::Adenine)
            }
        }
        RingClass::Pyrimidine => {
            let c5m = ctx.structure.has_atom(residue_index, "C5M");
            let o2p = ctx.structure.has_atom(residue_index, "O2'");
            if c5m && !o2p {
                Some(CanonicalBase::Thymine)
            } else if ctx.structure.has_atom(residue_index, "N4") {
                Some(CanonicalBase::Cytosine)
            } else {
                Some(CanonicalBase::Uracil)
            }
        }
        _ => None,
    }
}

/// Glycosidic torsion χ (O4'-C1'-N9-C4 for purines, O4'-C1'-N1-C2 for
/// pyrimidines); syn iff χ falls strictly inside the syn window. Missing
/// torsion atoms mean anti.
fn is_syn(ctx: &AnalysisContext<'_>, residue_index: usize, base: CanonicalBase) -> bool {
    let (glyco_n, ring_c) = if base.is_purine() {
        ("N9", "C4")
    } else {
        ("N1", "C2")
    };
    let o4 = ctx.structure.atom_position(residue_index, "O4'");
    let c1 = ctx.structure.atom_position(residue_index, "C1'");
    let n = ctx.structure.atom_position(residue_index, glyco_n);
    let c = ctx.structure.atom_position(residue_index, ring_c);
    match (o4, c1, n, c) {
        (Some(o4), Some(c1), Some(n), Some(c)) => {
            let chi = dihedral_deg(&o4, &c1, &n, &c);
            chi > SYN_CHI_MIN_DEG && chi < SYN_CHI_MAX_DEG
        }
        _ => false,
    }
}

/// Run base recognition over the whole structure.
#[instrument(skip_all, name = "base_recognition")]
pub fn run(ctx: &AnalysisContext<'_>) -> BaseTable {
    let mut recognised: Vec<BaseResidue> = Vec::new();

    for (residue_index, residue) in ctx.structure.residues().iter().enumerate() {
        if is_water(&residue.resname) {
            continue;
        }

        let id = if ctx.options.chain_id_truncate {
            residue.id.truncated()
        } else {
            residue.id.clone()
        };
        if !ctx.options.admits_chain(&id.chain) {
            continue;
        }

        let ring = ring_class(ctx, residue_index);
        if matches!(ring, RingClass::AminoAcid | RingClass::NotABase) {
            if canonical_base_for_resname(&residue.resname).is_some() {
                debug!(
                    residue = %residue.id,
                    resname = %residue.resname,
                    "named nucleotide without an intact ring, skipped"
                );
                bump(ctx.profile, |p| &p.skipped_residues);
            }
            continue;
        }

        let (code, flags) = match canonical_base_for_resname(&residue.resname) {
            Some(base) => (BaseCode::Canonical(base), BaseFlags::default()),
            None => match heuristic_letter(ctx, residue_index, ring) {
                Some(base) => (BaseCode::Modified(base), BaseFlags::MODIFIED),
                None => {
                    debug!(residue = %residue.id, "unclassifiable ring, skipped");
                    bump(ctx.profile, |p| &p.skipped_residues);
                    continue;
                }
            },
        };

        let syn = is_syn(ctx, residue_index, code.canonical());
        recognised.push(BaseResidue {
            residue_index,
            index: BaseIndex(0), // assigned after the singleton filter
            id,
            resname: residue.resname.clone(),
            code,
            ring,
            syn,
            flags,
        });
    }

    let mut bases = drop_chain_singletons(recognised, ctx);
    for (offset, base) in bases.iter_mut().enumerate() {
        base.index = BaseIndex(offset + 1);
    }
    debug!(total_bases = bases.len(), "base recognition complete");
    BaseTable { bases }
}

/// Drop consecutive same-chain runs of length one. A lone nucleotide on a
/// chain never pairs in the legacy numbering and would shift every index
/// after it.
fn drop_chain_singletons(
    recognised: Vec<BaseResidue>,
    ctx: &AnalysisContext<'_>,
) -> Vec<BaseResidue> {
    let mut kept: Vec<BaseResidue> = Vec::with_capacity(recognised.len());
    let mut run: Vec<BaseResidue> = Vec::new();

    for base in recognised {
        if let Some(last) = run.last() {
            if last.id.chain != base.id.chain {
                if run.len() > 1 {
                    kept.append(&mut run);
                } else {
                    for dropped in run.drain(..) {
                        debug!(residue = %dropped.id, "chain singleton dropped");
                        bump(ctx.profile, |p| &p.skipped_residues);
                    }
                }
            }
        }
        run.push(base);
    }
    if run.len() > 1 {
        kept.append(&mut run);
    } else {
        for dropped in run.drain(..) {
            debug!(residue = %dropped.id, "chain singleton dropped");
            bump(ctx.profile, |p| &p.skipped_residues);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::StructureBuilder;
    use crate::engine::options::AnalysisOptions;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::testutil::add_template_base;
    use nalgebra::{Isometry3, Point3, Translation3, Vector3};
    use std::collections::BTreeSet;

    fn push_ring(
        builder: &mut StructureBuilder,
        chain: &str,
        resseq: i32,
        resname: &str,
        purine: bool,
        extra: &[&str],
    ) {
        let id = ResidueId::new(chain, resseq);
        let mut serial = (resseq as usize) * 100;
        let mut push = |name: &str, x: f64, y: f64| {
            serial += 1;
            builder.push_atom(
                id.clone(),
                resname,
                Atom::new(serial, name, Point3::new(x, y, resseq as f64 * 20.0)),
            );
        };
        push("N1", 0.0, 0.0);
        push("C2", 1.4, 0.0);
        push("C6", 0.7, 1.2);
        if purine {
            push("N9", 0.0, -4.0);
        }
        for (k, name) in extra.iter().enumerate() {
            push(name, 3.0 + k as f64, 3.0);
        }
    }

    fn analyse(structure: &crate::core::models::structure::Structure, options: &AnalysisOptions) -> BaseTable {
        let reporter = ProgressReporter::new();
        let ctx = AnalysisContext::new(structure, options, &reporter);
        run(&ctx)
    }

    #[test]
    fn canonical_resnames_get_uppercase_letters() {
        let mut builder = StructureBuilder::new();
        push_ring(&mut builder, "A", 1, "G", true, &[]);
        push_ring(&mut builder, "A", 2, "C", false, &[]);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.len(), 2);
        assert_eq!(table.bases[0].code.letter(), 'G');
        assert_eq!(table.bases[1].code.letter(), 'C');
        assert!(!table.bases[0].code.is_modified());
        assert_eq!(table.bases[0].index, BaseIndex(1));
        assert_eq!(table.bases[1].index, BaseIndex(2));
    }

    #[test]
    fn modified_purine_with_n2_reads_lowercase_g() {
        let mut builder = StructureBuilder::new();
        push_ring(&mut builder, "A", 1, "1MG", true, &["N2"]);
        push_ring(&mut builder, "A", 2, "1MA", true, &[]);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.bases[0].code.letter(), 'g');
        assert_eq!(table.bases[1].code.letter(), 'a');
        assert!(table.bases[0].flags.contains(BaseFlags::MODIFIED));
    }

    #[test]
    fn modified_pyrimidine_priority_is_t_then_c_then_u() {
        let mut builder = StructureBuilder::new();
        push_ring(&mut builder, "A", 1, "XXT", false, &["C5M"]);
        push_ring(&mut builder, "A", 2, "XXC", false, &["N4", "O2'"]);
        push_ring(&mut builder, "A", 3, "XXU", false, &["O2'"]);
        // C5M plus a 2'-hydroxyl is not thymine.
        push_ring(&mut builder, "A", 4, "XXM", false, &["C5M", "O2'"]);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        let letters: Vec<char> = table.bases.iter().map(|b| b.code.letter()).collect();
        assert_eq!(letters, vec!['t', 'c', 'u', 'u']);
    }

    #[test]
    fn amino_acids_and_ringless_residues_are_skipped() {
        let mut builder = StructureBuilder::new();
        let ala = ResidueId::new("A", 1);
        builder.push_atom(ala.clone(), "ALA", Atom::new(1, "CA", Point3::origin()));
        builder.push_atom(ala, "ALA", Atom::new(2, "C", Point3::new(1.5, 0.0, 0.0)));
        push_ring(&mut builder, "A", 2, "G", true, &[]);
        push_ring(&mut builder, "A", 3, "C", false, &[]);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.len(), 2);
        assert_eq!(table.bases[0].id.resseq, 2);
    }

    #[test]
    fn chain_singletons_are_dropped_from_numbering() {
        let mut builder = StructureBuilder::new();
        push_ring(&mut builder, "A", 1, "G", true, &[]);
        push_ring(&mut builder, "A", 2, "C", false, &[]);
        push_ring(&mut builder, "B", 9, "U", false, &["O2'"]);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.len(), 2);
        assert!(table.bases.iter().all(|b| b.id.chain == "A"));
    }

    #[test]
    fn chain_filter_excludes_filtered_chains_from_numbering() {
        let mut builder = StructureBuilder::new();
        push_ring(&mut builder, "A", 1, "G", true, &[]);
        push_ring(&mut builder, "A", 2, "C", false, &[]);
        push_ring(&mut builder, "B", 1, "U", false, &[]);
        push_ring(&mut builder, "B", 2, "A", true, &[]);
        let structure = builder.build();

        let options = AnalysisOptions {
            chain_filter: Some(BTreeSet::from(["B".to_string()])),
            ..AnalysisOptions::default()
        };
        let table = analyse(&structure, &options);
        assert_eq!(table.len(), 2);
        assert_eq!(table.bases[0].id.chain, "B");
        assert_eq!(table.bases[0].index, BaseIndex(1));
    }

    #[test]
    fn syn_flag_follows_the_glycosidic_torsion() {
        // A template-built guanine carries the full sugar attachment in the
        // anti range by construction (no O4' atom -> not syn). Add a purine
        // with hand-placed torsion atoms inside the syn window.
        let mut builder = StructureBuilder::new();
        add_template_base(
            &mut builder,
            "A",
            1,
            "G",
            CanonicalBase::Guanine,
            &Isometry3::identity(),
        );
        let syn_id = ResidueId::new("A", 2);
        let mut serial = 900;
        let mut push = |name: &str, x: f64, y: f64, z: f64| {
            serial += 1;
            builder.push_atom(
                syn_id.clone(),
                "G",
                Atom::new(serial, name, Point3::new(x, y, z + 40.0)),
            );
        };
        // chi = 0 (cis chain) sits inside (-90, 90); the G letter routes the
        // torsion through N9/C4.
        push("O4'", 1.0, 1.0, 0.0);
        push("C1'", 1.0, 0.0, 0.0);
        push("N9", 2.0, 0.0, 0.0);
        push("C4", 2.0, 1.0, 0.0);
        // ring atoms so the residue is recognised
        push("N1", 5.0, 0.0, 0.0);
        push("C2", 6.4, 0.0, 0.0);
        push("C6", 5.7, 1.2, 0.0);
        let structure = builder.build();

        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.len(), 2);
        assert!(!table.bases[0].syn);
        assert!(table.bases[1].syn);
    }

    #[test]
    fn template_bases_are_recognised() {
        let mut builder = StructureBuilder::new();
        add_template_base(
            &mut builder,
            "A",
            1,
            "G",
            CanonicalBase::Guanine,
            &Isometry3::identity(),
        );
        add_template_base(
            &mut builder,
            "A",
            2,
            "C",
            CanonicalBase::Cytosine,
            &Isometry3::from_parts(
                Translation3::from(Vector3::new(0.0, 0.0, 30.0)),
                nalgebra::UnitQuaternion::identity(),
            ),
        );
        let structure = builder.build();
        let table = analyse(&structure, &AnalysisOptions::default());
        assert_eq!(table.len(), 2);
        assert_eq!(table.bases[0].ring, RingClass::Purine);
        assert_eq!(table.bases[1].ring, RingClass::Pyrimidine);
    }
}
