//! Data structures for the molecular system: atoms, residues, the flat
//! structure table, and base codes.
//!
//! Residues do not own their atoms; they reference a contiguous `[start, end)`
//! range in the structure's atom table. The `Structure` is the single owner,
//! everything else passes indices around.

pub mod atom;
pub mod base;
pub mod pairing;
pub mod residue;
pub mod structure;
