use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueId;
use crate::core::models::structure::{Structure, StructureBuilder};
use crate::core::tables::recognition::{canonical_atom_name, canonical_residue_name, is_water};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

/// Read options for the fixed-column PDB format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbReadOptions {
    /// Model to read from a multi-model (NMR) file. `None` reads the first
    /// model encountered.
    pub model: Option<usize>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Model {0} not present in file")]
    ModelNotFound(usize),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("ATOM/HETATM line shorter than the coordinate block (54 columns required)")]
    ShortAtomLine,
    #[error("Invalid integer in columns {columns}: {source}")]
    InvalidInt {
        columns: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid float in columns {columns}: {source}")]
    InvalidFloat {
        columns: &'static str,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Fixed-column slice that tolerates short lines by returning "".
fn columns(line: &str, start: usize, end: usize) -> &str {
    let len = line.len();
    if start >= len {
        return "";
    }
    &line[start..end.min(len)]
}

fn parse_f64(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns_label: &'static str,
) -> Result<f64, PdbError> {
    columns(line, start, end)
        .trim()
        .parse::<f64>()
        .map_err(|e| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: columns_label,
                source: e,
            },
        })
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Options = PdbReadOptions;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<Structure, Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut current_model: usize = 1;
        let mut selected_model: Option<usize> = options.model;
        // Atoms before any MODEL record belong to model 1.
        let mut saw_selected_model = options.model.map_or(true, |m| m == 1);
        let mut in_wanted_model = options.model.map_or(true, |m| m == 1);

        for (line_index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_num = line_index + 1;
            let record = columns(&line, 0, 6).trim_end();

            match record {
                "MODEL" => {
                    current_model = columns(&line, 6, 26)
                        .trim()
                        .parse::<usize>()
                        .unwrap_or(current_model + 1);
                    match selected_model {
                        // First model encountered becomes the selection.
                        None => {
                            selected_model = Some(current_model);
                            in_wanted_model = true;
                            saw_selected_model = true;
                        }
                        Some(wanted) => {
                            in_wanted_model = current_model == wanted;
                            if in_wanted_model {
                                saw_selected_model = true;
                            }
                        }
                    }
                }
                "ENDMDL" => {
                    in_wanted_model = selected_model.is_none();
                }
                "ATOM" | "HETATM" => {
                    if !in_wanted_model {
                        continue;
                    }
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::ShortAtomLine,
                        });
                    }

                    let resname = canonical_residue_name(columns(&line, 17, 20));
                    if is_water(&resname) {
                        continue;
                    }

                    let serial = columns(&line, 6, 11)
                        .trim()
                        .parse::<usize>()
                        .map_err(|e| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::InvalidInt {
                                columns: "7-11",
                                source: e,
                            },
                        })?;
                    let name = canonical_atom_name(columns(&line, 12, 16));
                    let altloc = columns(&line, 16, 17).chars().next().filter(|c| *c != ' ');
                    let chain = columns(&line, 21, 22).trim().to_string();
                    let resseq = columns(&line, 22, 26)
                        .trim()
                        .parse::<i32>()
                        .map_err(|e| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::InvalidInt {
                                columns: "23-26",
                                source: e,
                            },
                        })?;
                    let icode = columns(&line, 26, 27).chars().next().filter(|c| *c != ' ');

                    let x = parse_f64(&line, line_num, 30, 38, "31-38")?;
                    let y = parse_f64(&line, line_num, 38, 46, "39-46")?;
                    let z = parse_f64(&line, line_num, 46, 54, "47-54")?;

                    let occupancy = columns(&line, 54, 60).trim().parse::<f64>().unwrap_or(1.0);
                    let bfactor = columns(&line, 60, 66).trim().parse::<f64>().unwrap_or(0.0);
                    let element = columns(&line, 76, 78).trim().to_string();

                    // Alternate locations collapse to the first conformer
                    // seen; later altlocs of the same atom name are dropped
                    // by the builder.
                    let id = ResidueId {
                        chain,
                        resseq,
                        icode,
                        model: selected_model.unwrap_or(current_model),
                    };
                    let atom = Atom {
                        serial,
                        name,
                        element,
                        altloc,
                        position: Point3::new(x, y, z),
                        occupancy,
                        bfactor,
                    };
                    builder.push_atom(id, &resname, atom);
                }
                _ => {}
            }
        }

        if let Some(wanted) = options.model {
            if !saw_selected_model {
                return Err(PdbError::ModelNotFound(wanted));
            }
        }
        builder.set_model(selected_model.unwrap_or(1));
        Ok(builder.build())
    }
}
