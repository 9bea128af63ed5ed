//! Ethnobotanical index computation
//!
//! Quantitative indices over plant-use observation tables
//! (informant, taxon, use label, optional literature reference):
//! - `indices/`: FC, NU, UR, UV, CI, RFC, RI, CV per taxon; FL per
//!   (taxon, use); FIC per use category
//! - `composition`: several taxon indices merged into one wide table
//! - `similarity/`: Jaccard similarity between this study and the literature
//!   it cites
//! - `data`: loading and validating observation tables
//! - `export`: CSV output of every result table

pub mod error;
pub mod config;
pub mod utils;
pub mod data;
pub mod indices;
pub mod composition;
pub mod similarity;
pub mod export;

// Re-export commonly used types
pub use error::{EthnoError, Result};
pub use config::{AnalysisConfig, ColumnRoles};
pub use data::{Observation, ObservationTable};
pub use indices::{
    ConsensusTable, FidelityTable, TaxonIndex, TaxonIndexTable, TaxonScore, UseValueRow,
};
pub use composition::{
    all_taxon_indices, compose_indices, compose_indices_parallel, ComposedIndexTable, SortSpec,
};
pub use similarity::{run_analysis, PresenceMatrix, SimilarityOptions, SimilarityTable, StudyId};
