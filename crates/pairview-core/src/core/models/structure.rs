use super::atom::Atom;
use super::residue::{Residue, ResidueId};
use nalgebra::Point3;
use std::collections::HashSet;

/// A complete molecular structure: one flat atom table plus the residues
/// pointing into it.
///
/// The structure is the single owner of all atom data. Residues reference
/// their atoms through `[start, end)` index ranges, so iteration over a
/// residue's atoms is a contiguous slice walk and no pointer graph exists.
/// The table is immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    /// Model number the atoms were taken from (NMR ensembles).
    pub model: usize,
}

impl Structure {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    /// The atoms of one residue as a contiguous slice.
    pub fn residue_atoms(&self, index: usize) -> &[Atom] {
        match self.residues.get(index) {
            Some(residue) => &self.atoms[residue.atoms.clone()],
            None => &[],
        }
    }

    /// First atom with the given canonical name within a residue.
    pub fn find_atom<'a>(&'a self, residue_index: usize, name: &str) -> Option<&'a Atom> {
        self.residue_atoms(residue_index)
            .iter()
            .find(|atom| atom.name == name)
    }

    /// Position of the named atom within a residue, if present.
    pub fn atom_position(&self, residue_index: usize, name: &str) -> Option<Point3<f64>> {
        self.find_atom(residue_index, name).map(|atom| atom.position)
    }

    pub fn has_atom(&self, residue_index: usize, name: &str) -> bool {
        self.find_atom(residue_index, name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Incremental builder used by the file readers.
///
/// Atoms are appended in presentation order; a residue boundary is drawn
/// whenever the identity tuple changes. Duplicate atom names within one
/// residue collapse to the first occurrence (altloc handling upstream keeps
/// the first-seen conformer).
#[derive(Debug, Default)]
pub struct StructureBuilder {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    current: Option<(ResidueId, String, usize)>,
    seen_names: HashSet<String>,
    model: usize,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self {
            model: 1,
            ..Self::default()
        }
    }

    pub fn set_model(&mut self, model: usize) {
        self.model = model;
    }

    /// Append an atom to the residue identified by `(id, resname)`. Opens a
    /// new residue when the identity differs from the current one.
    pub fn push_atom(&mut self, id: ResidueId, resname: &str, atom: Atom) {
        let boundary = match &self.current {
            Some((current_id, current_name, _)) => {
                *current_id != id || current_name != resname
            }
            None => true,
        };
        if boundary {
            self.flush_current();
            self.current = Some((id, resname.to_string(), self.atoms.len()));
            self.seen_names.clear();
        }
        if self.seen_names.insert(atom.name.clone()) {
            self.atoms.push(atom);
        }
    }

    fn flush_current(&mut self) {
        if let Some((id, resname, start)) = self.current.take() {
            let range = start..self.atoms.len();
            if !range.is_empty() {
                self.residues.push(Residue::new(id, &resname, range));
            }
        }
    }

    pub fn build(mut self) -> Structure {
        self.flush_current();
        Structure {
            atoms: self.atoms,
            residues: self.residues,
            model: self.model,
        }
    }
}
