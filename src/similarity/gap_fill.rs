//! Gap filling relative to my study's taxon set
//!
//! Every study gets a row for each my-study taxon it lacks (all ailments 0).
//! Taxa a study has beyond my study's are left alone.

use crate::similarity::{PresenceMatrix, StudyId};

pub fn fill_missing_taxa(mut matrix: PresenceMatrix) -> PresenceMatrix {
    let my_taxa: Vec<String> = match matrix.my_study() {
        Some(mine) => mine.taxa().to_vec(),
        None => Vec::new(),
    };
    if my_taxa.is_empty() {
        return matrix;
    }
    let n_ailments = matrix.ailments.len();

    let mut filled = 0usize;
    for (study, block) in matrix.studies.iter_mut() {
        if *study == StudyId::MyStudy {
            continue;
        }
        for taxon in &my_taxa {
            if !block.contains(taxon) {
                block.row_mut(taxon, n_ailments);
                filled += 1;
            }
        }
    }

    tracing::debug!("Gap filling: {} all-zero rows added", filled);
    matrix
}
