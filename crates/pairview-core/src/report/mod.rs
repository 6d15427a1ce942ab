//! Canonical emitters. Both surfaces are pure functions of the finalized
//! [`AnalysisRecord`]: the legacy line-based text sections and the schema-v1
//! JSON document. Ordering and formatting are deterministic; neither emitter
//! consults the clock or the filesystem.
//!
//! [`AnalysisRecord`]: crate::engine::records::AnalysisRecord

pub mod json;
pub mod text;
