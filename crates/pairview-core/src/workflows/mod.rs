//! # Workflows Module
//!
//! The public, user-facing API. [`annotate`] runs the complete analysis of
//! one structure — recognition through statistics — and returns the
//! immutable record set the emitters consume.

pub mod annotate;
