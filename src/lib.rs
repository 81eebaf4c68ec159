//! Fragment quality scoring and Wiberg bond order benchmarks for WBO-guided
//! molecular fragmentation.
//!
//! The crate bundles a small, self-contained cheminformatics toolkit (SMILES
//! reading and canonical writing, ring perception, substructure matching,
//! partial charges and Wiberg bond orders) with the two analyses built on it.
//!
//! # Features
//!
//! - **Fragment scoring** - Builds a WBO-preserving fragment around every
//!   bond of a score table and reports the fragment's square-root MMD score,
//!   raw and min-max normalized over the bond's candidates
//! - **Phenyl benchmark** - Groups substituted phenyl and pyridine rings by
//!   substituent, collects the Wiberg bond order of the substituent bond and
//!   renders depictions and stacked density plots as PDF
//! - **Chemistry** - Gasteiger–Marsili or QEq partial charges and Hückel
//!   based Wiberg bond orders, computed from connectivity alone
//!
//! # Quick Start
//!
//! A [`Fragmenter`] annotates a mapped parent molecule once and then builds
//! one [`Fragment`] per requested bond:
//!
//! ```
//! use fragbench::{BondKey, Fragmenter, FragmenterConfig, parse_smiles};
//!
//! let parent = parse_smiles("[CH3:1][CH2:2][CH2:3][CH2:4][CH2:5][CH3:6]")?;
//! let fragmenter = Fragmenter::new(&parent, FragmenterConfig::default())?;
//!
//! // Either orientation names the same bond.
//! let fragment = fragmenter.build_fragment(BondKey::new(4, 3))?;
//! assert!(fragment.molecule.bond_by_key(BondKey::new(3, 4)).is_some());
//! assert!(fragment.heavy_atom_count() >= 4);
//! assert!(fragment.wbo_difference() <= 0.03 || fragment.heavy_atom_count() == 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`smiles`] - SMILES parsing and canonical SMILES
//! - [`chem`] - Partial charges and Wiberg bond orders
//! - [`fragment`] - The WBO fragmenter and its configuration
//! - [`score`] - Score tables, normalization and score reports
//! - [`phenyl`] - Substituent bond order distributions and figures
//! - [`io`] - Case directories, `.smi` files and JSON/PDF/SVG outputs
//!
//! # Data Types
//!
//! - [`Molecule`] - Heavy-atom graph with implicit hydrogens and atom maps
//! - [`Atom`] / [`Bond`] - Atoms with map index and partial charge; bonds
//!   with an optional Wiberg bond order
//! - [`BondKey`] - Orientation-free bond reference by atom-map indices
//! - [`Element`] / [`BondOrder`] - Supported elements and bond orders

mod model;
mod perception;

pub mod chem;
pub mod fragment;
pub mod io;
pub mod phenyl;
pub mod score;
pub mod smiles;

pub use model::atom::Atom;
pub use model::bond_key::{BondKey, ParseBondKeyError};
pub use model::molecule::{Bond, Molecule};
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};

pub use perception::rings::RingInfo;
pub use perception::substructure::{find_matches, has_match};

pub use smiles::{canonical_smiles, mapped_smiles, parse_smiles, parse_smiles_line};

pub use chem::{ChargeMethod, QeqConfig, SolverOptions, annotate};

pub use fragment::{
    Fragment, Fragmenter, FragmenterConfig, FunctionalGroupTable, FunctionalGroups, Heuristic,
};

pub use score::{BondOutcome, ScoreReport, ScoreRow, ScoreTable, run_scoring};

pub use phenyl::{DepictionSet, GroupAnalysis, WboDistribution, analyze_all};

pub use chem::Error as ChemError;
pub use fragment::Error as FragmentError;
pub use io::Error as IoError;
pub use phenyl::Error as PhenylError;
pub use score::Error as ScoreError;
pub use smiles::Error as SmilesError;
