use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    // --- Identity ---
    pub serial: usize,         // Atom serial number from source file
    pub name: String,          // Canonicalised atom name (e.g. "N1", "O2'")
    pub element: String,       // Element symbol as read (may be empty)
    pub altloc: Option<char>,  // Alternate-location indicator, if any

    // --- Coordinates & crystallographic fields ---
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub bfactor: f64,
}

impl Atom {
    pub fn new(serial: usize, name: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: String::new(),
            altloc: None,
            position,
            occupancy: 1.0,
            bfactor: 0.0,
        }
    }

    /// True for atoms that count toward hydrogen-bond distances (everything
    /// but hydrogen and deuterium).
    pub fn is_heavy(&self) -> bool {
        let first = self.name.trim().chars().next().map(|c| c.to_ascii_uppercase());
        !matches!(first, Some('H') | Some('D'))
    }
}
