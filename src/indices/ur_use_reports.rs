//! UR: Use Reports
//!
//! Total citations of a taxon: every row counts, repeated
//! informant/taxon/use triples included.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{TaxonIndex, TaxonIndexTable};
use crate::utils::{GroupIndex, KeyColumns};
use polars::prelude::*;

/// Calculate UR per taxon, sorted descending
pub fn calculate_ur(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.taxon], "UR")?;

    let mut taxa = GroupIndex::new();
    let mut reports: Vec<usize> = Vec::new();
    for row in keys.rows() {
        let slot = taxa.slot(row[0]);
        if slot == reports.len() {
            reports.push(0);
        }
        reports[slot] += 1;
    }

    let counts = taxa.keys().iter().copied().zip(reports).collect();
    let mut table = TaxonIndexTable::from_counts(TaxonIndex::Ur, &roles.taxon, counts);
    table.sort_descending();

    tracing::debug!("UR: {} rows -> {} taxa", keys.height(), table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{calculate_fc, fixtures};

    #[test]
    fn test_ur_counts_rows() {
        let ur = calculate_ur(&fixtures::four_row_table(), &ColumnRoles::default()).unwrap();

        let values: Vec<(&str, f64)> = ur.rows.iter().map(|r| (r.taxon.as_str(), r.value)).collect();
        assert_eq!(values, vec![("Species1", 2.0), ("Species2", 1.0), ("Species3", 1.0)]);
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let df = df![
            "informant" => &["A", "A", "A"],
            "taxon" => &["s1", "s1", "s1"],
            "ailments_treated" => &["Fever", "Fever", "Fever"],
        ]
        .unwrap();

        let ur = calculate_ur(&df, &ColumnRoles::default()).unwrap();
        assert_eq!(ur.get("s1"), Some(3.0));
    }

    #[test]
    fn test_fc_never_exceeds_ur() {
        let df = fixtures::six_row_table();
        let roles = ColumnRoles::default();
        let fc = calculate_fc(&df, &roles).unwrap();
        let ur = calculate_ur(&df, &roles).unwrap();
        let ur_by_taxon = ur.to_map();

        assert_eq!(fc.len(), ur.len());
        for row in &fc.rows {
            assert!(row.value <= ur_by_taxon[row.taxon.as_str()]);
        }
    }
}
