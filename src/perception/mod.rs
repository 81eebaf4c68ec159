//! Graph perception on [`Molecule`](crate::model::molecule::Molecule)s.
//!
//! - [`rings`] – Ring membership of atoms and bonds, and fused ring systems.
//! - [`substructure`] – Subgraph matching of small patterns (functional groups).

pub mod rings;
pub mod substructure;
