//! # pairview Core Library
//!
//! A library for detecting and classifying hydrogen-bonded base pairs, base
//! stacks and higher-order multiplets in RNA/DNA tertiary structures, in the
//! Leontis–Westhof edge/orientation scheme with Saenger correspondence.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`Structure`, flat atom tables with residue ranges), the immutable
//!   parameter tables (base templates, donor/acceptor sets, edge membership,
//!   thresholds), geometry utilities, and the boundary file readers.
//!
//! - **[`engine`]: The Logic Core.** The deterministic, single-threaded
//!   analysis pipeline: base recognition, reference frames, the candidate
//!   filter, hydrogen-bond enumeration, pair classification, stack detection,
//!   reduction, multiplet synthesis and statistics.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to run a complete annotation of
//!   one structure and hand back the finalized record set.
//!
//! The [`report`] module renders the finalized record set into the two
//! canonical output surfaces (legacy text sections and schema-v1 JSON); both
//! are deterministic functions of the record set.

pub mod core;
pub mod engine;
pub mod report;
pub mod workflows;
