//! FIC: Informant Consensus Factor
//!
//! Per use category: `FIC = (Nur - Nt) / (Nur - 1)` where `Nur` is the number of
//! use reports in the category and `Nt` the number of distinct taxa used for
//! it. When `Nur <= Nt` the factor is defined as 0, which also covers the
//! `Nur == 1` zero divisor.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::utils::{DistinctCounter, KeyColumns};
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusRow {
    pub use_label: String,
    /// Use reports
    pub nur: usize,
    /// Distinct taxa
    pub nt: usize,
    pub fic: f64,
}

/// FIC result, keyed by use category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusTable {
    pub use_column: String,
    pub rows: Vec<ConsensusRow>,
}

impl ConsensusTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, use_label: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.use_label == use_label).map(|r| r.fic)
    }

    /// Two-column frame: `<use_column>`, `FIC`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let uses: Vec<&str> = self.rows.iter().map(|r| r.use_label.as_str()).collect();
        let fic: Vec<f64> = self.rows.iter().map(|r| r.fic).collect();

        let df = DataFrame::new(vec![
            Column::new(self.use_column.as_str().into(), uses),
            Column::new("FIC".into(), fic),
        ])?;
        Ok(df)
    }
}

/// Consensus factor for one category
pub fn consensus_factor(nur: usize, nt: usize) -> f64 {
    if nur > nt {
        (nur - nt) as f64 / (nur - 1) as f64
    } else {
        0.0
    }
}

/// Calculate FIC per use category, sorted descending (ties in encounter order)
pub fn calculate_fic(df: &DataFrame, roles: &ColumnRoles) -> Result<ConsensusTable> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.use_label, &roles.taxon], "FIC")?;

    let mut taxa = DistinctCounter::new();
    let mut reports: Vec<usize> = Vec::new();
    for row in keys.rows() {
        taxa.add(row[0], row[1]);
        let slot = taxa.groups.slot(row[0]);
        if slot == reports.len() {
            reports.push(0);
        }
        reports[slot] += 1;
    }

    let mut rows: Vec<ConsensusRow> = taxa
        .into_counts()
        .into_iter()
        .zip(reports)
        .map(|((use_label, nt), nur)| ConsensusRow {
            use_label: use_label.to_string(),
            nur,
            nt,
            fic: consensus_factor(nur, nt),
        })
        .collect();
    rows.sort_by(|a, b| b.fic.total_cmp(&a.fic));

    tracing::debug!("FIC: {} use categories", rows.len());

    Ok(ConsensusTable {
        use_column: roles.use_label.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_consensus_factor_edge_cases() {
        assert_eq!(consensus_factor(0, 0), 0.0);
        assert_eq!(consensus_factor(1, 1), 0.0);
        assert_eq!(consensus_factor(3, 3), 0.0);
        assert_eq!(consensus_factor(4, 1), 1.0);
        assert_relative_eq!(consensus_factor(5, 2), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_fic_six_row_scenario() {
        // Headache: 3 reports, 1 taxon -> 1.0
        // Fever: 2 reports, 1 taxon -> 1.0
        // Cough: 1 report, 1 taxon -> 0
        let fic = calculate_fic(&fixtures::six_row_table(), &ColumnRoles::default()).unwrap();

        let order: Vec<&str> = fic.rows.iter().map(|r| r.use_label.as_str()).collect();
        assert_eq!(order, vec!["Headache", "Fever", "Cough"]);
        assert_eq!(fic.get("Headache"), Some(1.0));
        assert_eq!(fic.get("Fever"), Some(1.0));
        assert_eq!(fic.get("Cough"), Some(0.0));
    }

    #[test]
    fn test_fic_in_unit_interval() {
        let df = df![
            "informant" => &["A", "B", "C", "D", "E"],
            "taxon" => &["s1", "s2", "s1", "s3", "s3"],
            "ailments_treated" => &["Fever", "Fever", "Fever", "Fever", "Cough"],
        ]
        .unwrap();

        let fic = calculate_fic(&df, &ColumnRoles::default()).unwrap();
        let fever = fic.rows.iter().find(|r| r.use_label == "Fever").unwrap();
        assert_eq!((fever.nur, fever.nt), (4, 3));
        assert_relative_eq!(fever.fic, 1.0 / 3.0, epsilon = 1e-12);
        assert!(fic.rows.iter().all(|r| (0.0..=1.0).contains(&r.fic)));
    }
}
