use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueId;
use crate::core::models::structure::{Structure, StructureBuilder};
use crate::core::tables::recognition::{canonical_atom_name, canonical_residue_name, is_water};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Which `_atom_site` identifier family to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IdScheme {
    #[default]
    Auth,
    Label,
}

impl IdScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            IdScheme::Auth => "auth",
            IdScheme::Label => "label",
        }
    }
}

/// Read options for the mmCIF `_atom_site` loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MmcifReadOptions {
    pub id_scheme: IdScheme,
    /// Model to read from a multi-model file. `None` reads the first model
    /// number encountered.
    pub model: Option<usize>,
}

#[derive(Debug, Error)]
pub enum MmcifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No _atom_site loop found")]
    NoAtomSiteLoop,
    #[error("_atom_site loop is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Row {row}: column count {got} does not match header count {want}")]
    RowShape { row: usize, got: usize, want: usize },
    #[error("Row {row}: invalid number in '{column}': {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Model {0} not present in file")]
    ModelNotFound(usize),
}

/// Split one data line into CIF tokens, honouring single and double quotes.
fn cif_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '\'' || c == '"' {
            let quote = c;
            chars.next();
            let mut token = String::new();
            for ch in chars.by_ref() {
                if ch == quote {
                    break;
                }
                token.push(ch);
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }
    tokens
}

fn is_absent(value: &str) -> bool {
    value.is_empty() || value == "?" || value == "."
}

struct ColumnIndex {
    map: HashMap<String, usize>,
}

impl ColumnIndex {
    fn get(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    /// Scheme-preferred column with fallback to the other family.
    fn scheme(&self, scheme: IdScheme, field: &str) -> Option<usize> {
        let (first, second) = match scheme {
            IdScheme::Auth => (format!("auth_{field}"), format!("label_{field}")),
            IdScheme::Label => (format!("label_{field}"), format!("auth_{field}")),
        };
        self.get(&first).or_else(|| self.get(&second))
    }
}

pub struct MmcifFile;

impl StructureFile for MmcifFile {
    type Options = MmcifReadOptions;
    type Error = MmcifError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<Structure, Self::Error> {
        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        #[derive(PartialEq)]
        enum State {
            Scanning,
            InLoopHeader,
            InLoopData,
        }
        let mut state = State::Scanning;
        let mut pending_loop = false;

        for line_result in reader.lines() {
            let line = line_result?;
            let trimmed = line.trim();

            match state {
                State::Scanning => {
                    if trimmed == "loop_" {
                        pending_loop = true;
                    } else if pending_loop && trimmed.starts_with("_atom_site.") {
                        state = State::InLoopHeader;
                        headers.push(trimmed["_atom_site.".len()..].to_string());
                    } else if !trimmed.starts_with('_') && !trimmed.is_empty() {
                        pending_loop = false;
                    }
                }
                State::InLoopHeader => {
                    if trimmed.starts_with("_atom_site.") {
                        headers.push(trimmed["_atom_site.".len()..].to_string());
                    } else if trimmed.is_empty() || trimmed.starts_with('#') {
                        state = State::Scanning;
                        if !rows.is_empty() {
                            break;
                        }
                    } else {
                        state = State::InLoopData;
                        rows.push(cif_tokens(&line));
                    }
                }
                State::InLoopData => {
                    if trimmed.is_empty()
                        || trimmed.starts_with('#')
                        || trimmed.starts_with('_')
                        || trimmed == "loop_"
                    {
                        break;
                    }
                    rows.push(cif_tokens(&line));
                }
            }
        }

        if headers.is_empty() {
            return Err(MmcifError::NoAtomSiteLoop);
        }

        let index = ColumnIndex {
            map: headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect(),
        };

        let col_atom = index
            .scheme(options.id_scheme, "atom_id")
            .ok_or(MmcifError::MissingColumn("atom_id"))?;
        let col_comp = index
            .scheme(options.id_scheme, "comp_id")
            .ok_or(MmcifError::MissingColumn("comp_id"))?;
        let col_asym = index
            .scheme(options.id_scheme, "asym_id")
            .ok_or(MmcifError::MissingColumn("asym_id"))?;
        let col_seq = index
            .scheme(options.id_scheme, "seq_id")
            .ok_or(MmcifError::MissingColumn("seq_id"))?;
        let col_x = index.get("Cartn_x").ok_or(MmcifError::MissingColumn("Cartn_x"))?;
        let col_y = index.get("Cartn_y").ok_or(MmcifError::MissingColumn("Cartn_y"))?;
        let col_z = index.get("Cartn_z").ok_or(MmcifError::MissingColumn("Cartn_z"))?;
        let col_serial = index.get("id");
        let col_alt = index.get("label_alt_id");
        let col_icode = index.get("pdbx_PDB_ins_code");
        let col_occ = index.get("occupancy");
        let col_b = index.get("B_iso_or_equiv");
        let col_element = index.get("type_symbol");
        let col_model = index.get("pdbx_PDB_model_num");

        let want = headers.len();
        let mut builder = StructureBuilder::new();
        let mut selected_model: Option<usize> = options.model;
        let mut saw_selected_model = false;
        let mut serial_fallback = 0usize;

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != want {
                return Err(MmcifError::RowShape {
                    row: row_index + 1,
                    got: row.len(),
                    want,
                });
            }

            let model = match col_model {
                Some(col) => row[col].parse::<usize>().unwrap_or(1),
                None => 1,
            };
            match selected_model {
                None => {
                    selected_model = Some(model);
                    saw_selected_model = true;
                }
                Some(wanted) => {
                    if model != wanted {
                        continue;
                    }
                    saw_selected_model = true;
                }
            }

            let resname = canonical_residue_name(&row[col_comp]);
            if is_water(&resname) {
                continue;
            }

            serial_fallback += 1;
            let serial = col_serial
                .and_then(|col| row[col].parse::<usize>().ok())
                .unwrap_or(serial_fallback);

            // label_seq_id is '.' for heteroatoms; fall back to the auth
            // numbering so those residues still get a usable identity.
            let mut seq_field = row[col_seq].as_str();
            if is_absent(seq_field) {
                if let Some(col) = index.scheme(IdScheme::Auth, "seq_id") {
                    seq_field = row[col].as_str();
                }
            }
            let resseq = seq_field
                .parse::<i32>()
                .map_err(|_| MmcifError::InvalidNumber {
                    row: row_index + 1,
                    column: "seq_id",
                    value: seq_field.to_string(),
                })?;

            let parse_coord = |col: usize, label: &'static str| -> Result<f64, MmcifError> {
                row[col]
                    .parse::<f64>()
                    .map_err(|_| MmcifError::InvalidNumber {
                        row: row_index + 1,
                        column: label,
                        value: row[col].clone(),
                    })
            };
            let x = parse_coord(col_x, "Cartn_x")?;
            let y = parse_coord(col_y, "Cartn_y")?;
            let z = parse_coord(col_z, "Cartn_z")?;

            let altloc = col_alt
                .map(|col| row[col].as_str())
                .filter(|v| !is_absent(v))
                .and_then(|v| v.chars().next());
            let icode = col_icode
                .map(|col| row[col].as_str())
                .filter(|v| !is_absent(v))
                .and_then(|v| v.chars().next());
            let occupancy = col_occ
                .and_then(|col| row[col].parse::<f64>().ok())
                .unwrap_or(1.0);
            let bfactor = col_b
                .and_then(|col| row[col].parse::<f64>().ok())
                .unwrap_or(0.0);
            let element = col_element
                .map(|col| row[col].clone())
                .filter(|v| !is_absent(v))
                .unwrap_or_default();

            let id = ResidueId {
                chain: row[col_asym].clone(),
                resseq,
                icode,
                model,
            };
            let atom = Atom {
                serial,
                name: canonical_atom_name(&row[col_atom]),
                element,
                altloc,
                position: Point3::new(x, y, z),
                occupancy,
                bfactor,
            };
            builder.push_atom(id, &resname, atom);
        }

        if let Some(wanted) = options.model {
            if !saw_selected_model {
                return Err(MmcifError::ModelNotFound(wanted));
            }
        }
        builder.set_model(selected_model.unwrap_or(1));
        Ok(builder.build())
    }
}
