use std::fmt;

/// The six canonical nucleobases the annotator recognises by residue name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalBase {
    Adenine,      // A
    Guanine,      // G
    Cytosine,     // C
    Uracil,       // U
    Thymine,      // T
    Inosine,      // I
    Pseudouridine, // P
}

impl CanonicalBase {
    pub fn letter(self) -> char {
        match self {
            CanonicalBase::Adenine => 'A',
            CanonicalBase::Guanine => 'G',
            CanonicalBase::Cytosine => 'C',
            CanonicalBase::Uracil => 'U',
            CanonicalBase::Thymine => 'T',
            CanonicalBase::Inosine => 'I',
            CanonicalBase::Pseudouridine => 'P',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(CanonicalBase::Adenine),
            'G' => Some(CanonicalBase::Guanine),
            'C' => Some(CanonicalBase::Cytosine),
            'U' => Some(CanonicalBase::Uracil),
            'T' => Some(CanonicalBase::Thymine),
            'I' => Some(CanonicalBase::Inosine),
            'P' => Some(CanonicalBase::Pseudouridine),
            _ => None,
        }
    }

    pub fn is_purine(self) -> bool {
        matches!(
            self,
            CanonicalBase::Adenine | CanonicalBase::Guanine | CanonicalBase::Inosine
        )
    }
}

/// A base assignment with its provenance.
///
/// `Canonical` means the residue name matched the canonical table and the
/// letter is emitted uppercase. `Modified` means the letter was assigned by
/// the atom-presence heuristic and is emitted lowercase. The case carries
/// semantics and round-trips through the emitters unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseCode {
    Canonical(CanonicalBase),
    Modified(CanonicalBase),
}

impl BaseCode {
    /// The canonical identity used for table lookups, ignoring provenance.
    pub fn canonical(self) -> CanonicalBase {
        match self {
            BaseCode::Canonical(base) | BaseCode::Modified(base) => base,
        }
    }

    /// The single-letter emission form; case encodes provenance.
    pub fn letter(self) -> char {
        match self {
            BaseCode::Canonical(base) => base.letter(),
            BaseCode::Modified(base) => base.letter().to_ascii_lowercase(),
        }
    }

    pub fn is_modified(self) -> bool {
        matches!(self, BaseCode::Modified(_))
    }

    /// Parse a single-letter form back into a code, preserving case
    /// semantics. Returns `None` for letters outside the recognised set.
    pub fn from_letter(letter: char) -> Option<Self> {
        let base = CanonicalBase::from_letter(letter)?;
        if letter.is_ascii_uppercase() {
            Some(BaseCode::Canonical(base))
        } else {
            Some(BaseCode::Modified(base))
        }
    }
}

impl fmt::Display for BaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_case_encodes_provenance() {
        assert_eq!(BaseCode::Canonical(CanonicalBase::Guanine).letter(), 'G');
        assert_eq!(BaseCode::Modified(CanonicalBase::Guanine).letter(), 'g');
    }

    #[test]
    fn letters_round_trip_with_case() {
        for letter in ['A', 'G', 'C', 'U', 'T', 'I', 'P', 'a', 'g', 'c', 'u', 't', 'i', 'p'] {
            let code = BaseCode::from_letter(letter).unwrap();
            assert_eq!(code.letter(), letter);
        }
        assert!(BaseCode::from_letter('X').is_none());
        assert!(BaseCode::from_letter('n').is_none());
    }

    #[test]
    fn purine_classification() {
        assert!(CanonicalBase::Adenine.is_purine());
        assert!(CanonicalBase::Inosine.is_purine());
        assert!(!CanonicalBase::Uracil.is_purine());
        assert!(!CanonicalBase::Pseudouridine.is_purine());
    }
}
