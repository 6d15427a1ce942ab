use std::fmt;
use std::ops::Range;

/// Identity of a residue within one structure.
///
/// The tuple `(chain, resseq, icode, model)` is unique inside a `Structure`;
/// the readers enforce this. Chain identifiers keep their full length as read
/// (mmCIF auth/label ids may be multi-character); the legacy one-character
/// compatibility mode is a pre-processing step, not a property of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueId {
    pub chain: String,
    pub resseq: i32,
    pub icode: Option<char>,
    pub model: usize,
}

impl ResidueId {
    pub fn new(chain: &str, resseq: i32) -> Self {
        Self {
            chain: chain.to_string(),
            resseq,
            icode: None,
            model: 1,
        }
    }

    /// Single-character chain form used by the legacy record grammar.
    pub fn chain_char(&self) -> char {
        self.chain.chars().next().unwrap_or(' ')
    }

    /// Legacy compatibility: restrict the chain identifier to its first
    /// character. Returns a new identity; the structure itself is untouched.
    pub fn truncated(&self) -> Self {
        Self {
            chain: self.chain_char().to_string(),
            resseq: self.resseq,
            icode: self.icode,
            model: self.model,
        }
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.resseq)?;
        if let Some(icode) = self.icode {
            write!(f, "^{icode}")?;
        }
        Ok(())
    }
}

/// A residue referencing its atoms as a `[start, end)` range in the
/// structure's flat atom table.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: ResidueId,
    pub resname: String,
    pub atoms: Range<usize>,
}

impl Residue {
    pub fn new(id: ResidueId, resname: &str, atoms: Range<usize>) -> Self {
        Self {
            id,
            resname: resname.to_string(),
            atoms,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residue_id_display_includes_icode_when_present() {
        let mut id = ResidueId::new("A", 42);
        assert_eq!(id.to_string(), "A:42");
        id.icode = Some('B');
        assert_eq!(id.to_string(), "A:42^B");
    }

    #[test]
    fn truncated_keeps_first_chain_character_only() {
        let id = ResidueId::new("AB", 7);
        let truncated = id.truncated();
        assert_eq!(truncated.chain, "A");
        assert_eq!(truncated.resseq, 7);
    }

    #[test]
    fn chain_char_of_empty_chain_is_blank() {
        let id = ResidueId::new("", 1);
        assert_eq!(id.chain_char(), ' ');
    }
}
