//! Conversion: observation rows -> study presence matrix
//!
//! Every record contributes to the "my study" block. Each literature reference
//! on the record (split on the delimiter) contributes the same taxon/ailment
//! to that reference's block. Repeated contributions stay at presence 1.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::similarity::StudyId;
use crate::utils::{string_column, GroupIndex, KeyColumns};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// One study's rows: taxon -> presence vector over the ailment universe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyBlock {
    taxa: Vec<String>,
    slots: FxHashMap<String, usize>,
    presence: Vec<Vec<bool>>,
}

impl StudyBlock {
    /// Row for `taxon`, created as all-zero if absent
    pub fn row_mut(&mut self, taxon: &str, n_ailments: usize) -> &mut Vec<bool> {
        let slot = match self.slots.get(taxon) {
            Some(&slot) => slot,
            None => {
                let slot = self.taxa.len();
                self.taxa.push(taxon.to_string());
                self.slots.insert(taxon.to_string(), slot);
                self.presence.push(vec![false; n_ailments]);
                slot
            }
        };
        &mut self.presence[slot]
    }

    pub fn get(&self, taxon: &str) -> Option<&[bool]> {
        self.slots.get(taxon).map(|&slot| self.presence[slot].as_slice())
    }

    pub fn contains(&self, taxon: &str) -> bool {
        self.slots.contains_key(taxon)
    }

    /// Taxa in insertion order
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// `(taxon, presence)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.taxa
            .iter()
            .map(String::as_str)
            .zip(self.presence.iter().map(Vec::as_slice))
    }
}

/// (study, taxon) -> ailment presence
///
/// Ailment columns cover every use label in the source table, not only those
/// of a given study.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceMatrix {
    pub taxon_column: String,
    pub ailments: Vec<String>,
    pub studies: BTreeMap<StudyId, StudyBlock>,
}

impl PresenceMatrix {
    pub fn new(taxon_column: &str, ailments: Vec<String>) -> Self {
        Self {
            taxon_column: taxon_column.to_string(),
            ailments,
            studies: BTreeMap::new(),
        }
    }

    pub fn n_studies(&self) -> usize {
        self.studies.len()
    }

    pub fn study(&self, id: &StudyId) -> Option<&StudyBlock> {
        self.studies.get(id)
    }

    pub fn my_study(&self) -> Option<&StudyBlock> {
        self.studies.get(&StudyId::MyStudy)
    }

    /// Mark `ailment` present for `(study, taxon)`
    pub fn mark(&mut self, study: StudyId, taxon: &str, ailment: usize) {
        let n_ailments = self.ailments.len();
        let row = self.studies.entry(study).or_default().row_mut(taxon, n_ailments);
        row[ailment] = true;
    }

    /// Long frame: `study`, `<taxon_column>`, one UInt8 column per ailment
    pub fn to_dataframe(&self, my_study_label: &str) -> Result<DataFrame> {
        let mut studies: Vec<&str> = Vec::new();
        let mut taxa: Vec<&str> = Vec::new();
        let mut cells: Vec<Vec<u8>> = vec![Vec::new(); self.ailments.len()];

        for (study, block) in &self.studies {
            for (taxon, presence) in block.iter() {
                studies.push(study.label(my_study_label));
                taxa.push(taxon);
                for (column, &present) in cells.iter_mut().zip(presence) {
                    column.push(present as u8);
                }
            }
        }

        let mut columns = vec![
            Column::new("study".into(), studies),
            Column::new(self.taxon_column.as_str().into(), taxa),
        ];
        for (name, values) in self.ailments.iter().zip(cells) {
            columns.push(Column::new(name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Literature references of one record: trimmed, non-empty segments
fn split_references(field: Option<&str>, delimiter: char) -> SmallVec<[&str; 4]> {
    field
        .map(|text| {
            text.split(delimiter)
                .map(str::trim)
                .filter(|reference| !reference.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Build the presence matrix from an observation table
///
/// A missing or non-text literature column means "no references": every
/// record then contributes only to my study.
pub fn convert_observations(
    df: &DataFrame,
    roles: &ColumnRoles,
    delimiter: char,
) -> Result<PresenceMatrix> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.taxon, &roles.use_label], "Similarity")?;

    let literature = if df.get_column_index(&roles.literature).is_some() {
        match string_column(df, &roles.literature, "Similarity") {
            Ok(column) => Some(column),
            Err(err) => {
                tracing::warn!(
                    "Literature column '{}' is not text ({}); treating records as unreferenced",
                    roles.literature,
                    err
                );
                None
            }
        }
    } else {
        tracing::warn!(
            "Literature column '{}' not found; only my study will be present",
            roles.literature
        );
        None
    };

    let mut ailment_index: GroupIndex<&str> = GroupIndex::new();
    for row in keys.rows() {
        ailment_index.slot(row[1]);
    }
    let ailments = ailment_index.keys().iter().map(|a| a.to_string()).collect();
    let mut matrix = PresenceMatrix::new(&roles.taxon, ailments);

    for (idx, row) in keys.indexed_rows() {
        let (taxon, ailment) = (row[0], row[1]);
        let Some(slot) = ailment_index.get(&ailment) else {
            continue;
        };

        matrix.mark(StudyId::MyStudy, taxon, slot);

        let field = literature.as_ref().and_then(|column| column.get(idx));
        for reference in split_references(field, delimiter) {
            matrix.mark(StudyId::Reference(reference.to_string()), taxon, slot);
        }
    }

    tracing::debug!(
        "Conversion: {} rows -> {} studies",
        keys.height(),
        matrix.n_studies()
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> StudyId {
        StudyId::Reference(name.to_string())
    }

    fn sample_table() -> DataFrame {
        df![
            "informant" => &["A", "B", "C", "D"],
            "taxon" => &["s1", "s1", "s2", "s3"],
            "ailments_treated" => &["Fever", "Cough", "Fever", "Pain"],
            "literature" => &[Some("Smith 2001;Lee 2010"), Some("Lee 2010"), None, Some(" ; Smith 2001 ")],
        ]
        .unwrap()
    }

    #[test]
    fn test_split_references() {
        assert_eq!(split_references(Some("a;b"), ';').as_slice(), &["a", "b"]);
        assert_eq!(split_references(Some(" a ; ;b "), ';').as_slice(), &["a", "b"]);
        assert!(split_references(None, ';').is_empty());
        assert!(split_references(Some(""), ';').is_empty());
    }

    #[test]
    fn test_every_record_reaches_my_study() {
        let matrix = convert_observations(&sample_table(), &ColumnRoles::default(), ';').unwrap();

        assert_eq!(matrix.ailments, vec!["Fever", "Cough", "Pain"]);
        let mine = matrix.my_study().unwrap();
        assert_eq!(mine.taxa(), &["s1", "s2", "s3"]);
        assert_eq!(mine.get("s1").unwrap(), &[true, true, false]);
        assert_eq!(mine.get("s3").unwrap(), &[false, false, true]);
    }

    #[test]
    fn test_references_get_their_own_rows() {
        let matrix = convert_observations(&sample_table(), &ColumnRoles::default(), ';').unwrap();

        assert_eq!(matrix.n_studies(), 3);
        let lee = matrix.study(&reference("Lee 2010")).unwrap();
        assert_eq!(lee.get("s1").unwrap(), &[true, true, false]);
        assert!(!lee.contains("s2"));

        let smith = matrix.study(&reference("Smith 2001")).unwrap();
        assert_eq!(smith.taxa(), &["s1", "s3"]);
        assert_eq!(smith.get("s1").unwrap(), &[true, false, false]);
    }

    #[test]
    fn test_repeats_clip_to_presence() {
        let df = df![
            "informant" => &["A", "B"],
            "taxon" => &["s1", "s1"],
            "ailments_treated" => &["Fever", "Fever"],
            "literature" => &["R1", "R1"],
        ]
        .unwrap();

        let matrix = convert_observations(&df, &ColumnRoles::default(), ';').unwrap();
        let frame = matrix.to_dataframe("My Study").unwrap();

        assert_eq!(frame.height(), 2);
        let fever = frame.column("Fever").unwrap().u8().unwrap();
        assert!(fever.into_iter().all(|v| v == Some(1)));
    }

    #[test]
    fn test_missing_literature_column_means_no_references() {
        let df = df![
            "informant" => &["A"],
            "taxon" => &["s1"],
            "ailments_treated" => &["Fever"],
        ]
        .unwrap();

        let matrix = convert_observations(&df, &ColumnRoles::default(), ';').unwrap();
        assert_eq!(matrix.n_studies(), 1);
        assert!(matrix.my_study().is_some());
    }
}
