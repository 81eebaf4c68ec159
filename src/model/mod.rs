//! Core data structures representing molecules and bond references.
//!
//! - [`types`] – Elements and bond order classifications.
//! - [`atom`] – Heavy atom with implicit hydrogens, map index and partial charge.
//! - [`molecule`] – Molecular graph with optional Wiberg bond order annotations.
//! - [`bond_key`] – Orientation-free bond reference built from atom-map indices.

pub mod atom;
pub mod bond_key;
pub mod molecule;
pub mod types;
