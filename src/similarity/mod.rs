//! Cross-study similarity
//!
//! Three strictly sequential stages:
//! 1. `conversion`: observation rows -> (study, taxon) ailment-presence matrix
//! 2. `gap_fill`: every study gets an all-zero row for my-study taxa it lacks
//! 3. `jaccard`: Jaccard score between my study and each reference study
//!
//! `run_analysis` chains them.

pub mod conversion;
pub mod gap_fill;
pub mod jaccard;

pub use conversion::{convert_observations, PresenceMatrix, StudyBlock};
pub use gap_fill::fill_missing_taxa;
pub use jaccard::{jaccard_similarity, pairwise_similarity, SimilarityTable, StudySimilarity};

use crate::config::{ColumnRoles, DEFAULT_LITERATURE_DELIMITER, DEFAULT_MY_STUDY_LABEL};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// A source of taxon-ailment reports
///
/// The current dataset is a distinct variant, so no literature reference can
/// collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StudyId {
    MyStudy,
    Reference(String),
}

impl StudyId {
    /// Label used in output tables
    pub fn label<'a>(&'a self, my_study_label: &'a str) -> &'a str {
        match self {
            StudyId::MyStudy => my_study_label,
            StudyId::Reference(reference) => reference,
        }
    }

    pub fn is_my_study(&self) -> bool {
        matches!(self, StudyId::MyStudy)
    }
}

/// Settings for one similarity run
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityOptions {
    pub my_study_label: String,
    pub delimiter: char,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            my_study_label: DEFAULT_MY_STUDY_LABEL.to_string(),
            delimiter: DEFAULT_LITERATURE_DELIMITER,
        }
    }
}

/// Conversion -> gap filling -> pairwise Jaccard
pub fn run_analysis(
    df: &DataFrame,
    roles: &ColumnRoles,
    options: &SimilarityOptions,
) -> Result<SimilarityTable> {
    let matrix = convert_observations(df, roles, options.delimiter)?;
    tracing::info!(
        "Presence matrix: {} studies, {} ailment categories",
        matrix.n_studies(),
        matrix.ailments.len()
    );

    let filled = fill_missing_taxa(matrix);
    let table = pairwise_similarity(&filled, &options.my_study_label);

    tracing::info!("Jaccard similarity computed for {} reference studies", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_ids_never_collide() {
        let reference = StudyId::Reference("My Study".to_string());
        assert_ne!(reference, StudyId::MyStudy);
        assert_eq!(reference.label("My Study"), StudyId::MyStudy.label("My Study"));
    }

    #[test]
    fn test_non_text_literature_means_no_references() {
        let literature = Series::new(
            "literature".into(),
            vec![Series::new("".into(), &[1i32, 2]), Series::new("".into(), &[3i32])],
        );
        let df = DataFrame::new(vec![
            Column::new("informant".into(), &["A", "B"]),
            Column::new("taxon".into(), &["s1", "s2"]),
            Column::new("ailments_treated".into(), &["Fever", "Cough"]),
            literature.into_column(),
        ])
        .unwrap();

        let table = run_analysis(&df, &ColumnRoles::default(), &SimilarityOptions::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_my_study_sorts_first() {
        let mut ids = vec![
            StudyId::Reference("b".to_string()),
            StudyId::MyStudy,
            StudyId::Reference("a".to_string()),
        ];
        ids.sort();
        assert_eq!(ids[0], StudyId::MyStudy);
        assert_eq!(ids[1], StudyId::Reference("a".to_string()));
    }
}
