//! # Core Module
//!
//! Fundamental building blocks for base-pair annotation: the molecular data
//! model, the immutable parameter tables shared by the engine and its tests,
//! geometry utilities, and the boundary file readers.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Flat atom tables, residues as
//!   index ranges, base codes with case semantics
//! - **Parameter Tables** ([`tables`]) - Base recognition templates, standard
//!   reference geometries, donor/acceptor and edge-membership sets, and the
//!   single named-thresholds table
//! - **File I/O** ([`io`]) - PDB and mmCIF readers producing `Structure`
//! - **Utilities** ([`utils`]) - Superposition, dihedrals, plane fits

pub mod io;
pub mod models;
pub mod tables;
pub mod utils;
