//! Pairwise Jaccard similarity between my study and each reference study

use crate::error::Result;
use crate::similarity::{PresenceMatrix, StudyBlock};
use polars::prelude::*;
use serde::Serialize;

/// |A ∩ B| / |A ∪ B| over two presence vectors of equal length
///
/// Two vectors with no set bits have an empty union; that pair scores 0.
pub fn jaccard_similarity(a: &[bool], b: &[bool]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut intersection = 0usize;
    let mut union = 0usize;
    for (&x, &y) in a.iter().zip(b) {
        intersection += (x && y) as usize;
        union += (x || y) as usize;
    }

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Flatten two blocks into equal-length vectors, aligned taxon by taxon
///
/// Taxa run over the union of both blocks: `mine` in its order, then the
/// reference's extra taxa. A taxon missing from one side contributes zeros.
fn flatten_aligned(mine: &StudyBlock, other: &StudyBlock, n_ailments: usize) -> (Vec<bool>, Vec<bool>) {
    let zeros = vec![false; n_ailments];
    let extra = other.taxa().iter().filter(|taxon| !mine.contains(taxon.as_str()));
    let taxa = mine.taxa().iter().chain(extra);

    let mut a = Vec::with_capacity((mine.len() + other.len()) * n_ailments);
    let mut b = Vec::with_capacity(a.capacity());
    for taxon in taxa {
        a.extend_from_slice(mine.get(taxon).unwrap_or(zeros.as_slice()));
        b.extend_from_slice(other.get(taxon).unwrap_or(zeros.as_slice()));
    }
    (a, b)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySimilarity {
    pub study: String,
    pub similarity: f64,
}

/// One row per reference study, ordered by reference identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityTable {
    pub rows: Vec<StudySimilarity>,
}

impl SimilarityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, study: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.study == study)
            .map(|r| r.similarity)
    }

    /// `study`, `similarity`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let studies: Vec<&str> = self.rows.iter().map(|r| r.study.as_str()).collect();
        let scores: Vec<f64> = self.rows.iter().map(|r| r.similarity).collect();

        Ok(DataFrame::new(vec![
            Column::new("study".into(), studies),
            Column::new("similarity".into(), scores),
        ])?)
    }
}

/// Score every non-my-study block against the my-study block
///
/// Without a my-study block (empty input) there is nothing to compare and the
/// table is empty.
pub fn pairwise_similarity(matrix: &PresenceMatrix, my_study_label: &str) -> SimilarityTable {
    let Some(mine) = matrix.my_study() else {
        return SimilarityTable::default();
    };
    let n_ailments = matrix.ailments.len();

    let rows = matrix
        .studies
        .iter()
        .filter(|(study, _)| !study.is_my_study())
        .map(|(study, block)| {
            let (a, b) = flatten_aligned(mine, block, n_ailments);
            StudySimilarity {
                study: study.label(my_study_label).to_string(),
                similarity: jaccard_similarity(&a, &b),
            }
        })
        .collect();

    SimilarityTable { rows }
}
