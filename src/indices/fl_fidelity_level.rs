//! FL: Fidelity Level
//!
//! Per (taxon, use) pair: `FL = 100 × Ns / FC(taxon)`, where `Ns` is the number
//! of distinct informants citing the taxon for that exact use. Rows whose FL
//! is exactly 0 are dropped.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{calculate_fc, ratio};
use crate::utils::{DistinctCounter, KeyColumns};
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FidelityRow {
    pub taxon: String,
    pub use_label: String,
    /// Informants citing this taxon for this use
    pub ns: usize,
    /// Informants citing this taxon for any use
    pub fc: usize,
    pub fl: f64,
}

/// FL result, keyed by (taxon, use)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FidelityTable {
    pub taxon_column: String,
    pub use_column: String,
    pub rows: Vec<FidelityRow>,
}

impl FidelityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, taxon: &str, use_label: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.taxon == taxon && r.use_label == use_label)
            .map(|r| r.fl)
    }

    /// Three-column frame: `<taxon_column>`, `<use_column>`, `FL`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let taxa: Vec<&str> = self.rows.iter().map(|r| r.taxon.as_str()).collect();
        let uses: Vec<&str> = self.rows.iter().map(|r| r.use_label.as_str()).collect();
        let fl: Vec<f64> = self.rows.iter().map(|r| r.fl).collect();

        let df = DataFrame::new(vec![
            Column::new(self.taxon_column.as_str().into(), taxa),
            Column::new(self.use_column.as_str().into(), uses),
            Column::new("FL".into(), fl),
        ])?;
        Ok(df)
    }
}

/// Calculate FL for every (taxon, use) pair, in encounter order
pub fn calculate_fl(df: &DataFrame, roles: &ColumnRoles) -> Result<FidelityTable> {
    let fc = calculate_fc(df, roles)?;
    let keys = KeyColumns::for_roles(
        df,
        roles,
        &[&roles.taxon, &roles.use_label, &roles.informant],
        "FL",
    )?;

    let mut ns: DistinctCounter<'_, (&str, &str)> = DistinctCounter::new();
    for row in keys.rows() {
        ns.add((row[0], row[1]), row[2]);
    }

    let fc_by_taxon = fc.to_map();
    let rows: Vec<FidelityRow> = ns
        .into_counts()
        .into_iter()
        .filter_map(|((taxon, use_label), ns)| {
            let fc = *fc_by_taxon.get(taxon)?;
            Some(FidelityRow {
                taxon: taxon.to_string(),
                use_label: use_label.to_string(),
                ns,
                fc: fc as usize,
                fl: ratio(ns as f64 * 100.0, fc),
            })
        })
        .filter(|row| row.fl != 0.0)
        .collect();

    tracing::debug!("FL: {} taxon/use pairs", rows.len());

    Ok(FidelityTable {
        taxon_column: roles.taxon.clone(),
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
    fn test_fl_single_use_taxa_score_100() {
        let fl = calculate_fl(&fixtures::six_row_table(), &ColumnRoles::default()).unwrap();

        assert_eq!(fl.len(), 3);
        assert!(fl.rows.iter().all(|r| r.fl == 100.0));
        assert_eq!(fl.rows[0].taxon, "Species1");
        assert_eq!(fl.rows[0].use_label, "Headache");
    }

    #[test]
    fn test_fl_splits_informants_between_uses() {
        // 4 informants cite s1; 3 for Fever, 1 for Cough
        let df = df![
            "informant" => &["A", "B", "C", "D", "A"],
            "taxon" => &["s1", "s1", "s1", "s1", "s1"],
            "ailments_treated" => &["Fever", "Fever", "Fever", "Cough", "Fever"],
        ]
        .unwrap();

        let fl = calculate_fl(&df, &ColumnRoles::default()).unwrap();
        assert_relative_eq!(fl.get("s1", "Fever").unwrap(), 75.0, epsilon = 1e-12);
        assert_relative_eq!(fl.get("s1", "Cough").unwrap(), 25.0, epsilon = 1e-12);
        assert_eq!(fl.rows[0].ns, 3);
        assert_eq!(fl.rows[0].fc, 4);
    }

    #[test]
    fn test_fl_never_contains_zero() {
        let fl = calculate_fl(&fixtures::four_row_table(), &ColumnRoles::default()).unwrap();
        assert!(fl.rows.iter().all(|r| r.fl != 0.0));
    }

    #[test]
    fn test_fl_dataframe_columns() {
        let fl = calculate_fl(&fixtures::four_row_table(), &ColumnRoles::default()).unwrap();
        let df = fl.to_dataframe().unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(df.height(), 3);
        assert!(df.column("FL").is_ok());
    }
}
