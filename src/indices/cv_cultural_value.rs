//! CV: Cultural Value
//!
//! `CV = Uce × Ice × IUce` where
//! - `Uce  = NU / (distinct use labels in the table)`
//! - `Ice  = FC / N`
//! - `IUce = UR / N`
//!
//! with `N` the number of distinct informants.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{
    calculate_fc, calculate_nu, calculate_ur, count_distinct, count_informants, ratio, TaxonIndex,
    TaxonIndexTable, TaxonScore,
};
use polars::prelude::*;

/// Calculate CV per taxon, sorted descending
pub fn calculate_cv(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let nu = calculate_nu(df, roles)?;
    let fc = calculate_fc(df, roles)?;
    let ur = calculate_ur(df, roles)?;

    let potential_uses = count_distinct(df, roles, &roles.use_label, "CV")? as f64;
    let n_informants = count_informants(df, roles, "CV")? as f64;

    let fc_by_taxon = fc.to_map();
    let ur_by_taxon = ur.to_map();

    let rows = nu
        .rows
        .iter()
        .filter_map(|row| {
            let taxon = row.taxon.as_str();
            let uce = ratio(row.value, potential_uses);
            let ice = ratio(*fc_by_taxon.get(taxon)?, n_informants);
            let iuce = ratio(*ur_by_taxon.get(taxon)?, n_informants);
            Some(TaxonScore {
                taxon: row.taxon.clone(),
                value: uce * ice * iuce,
            })
        })
        .collect();

    let mut table = TaxonIndexTable::new(TaxonIndex::Cv, &roles.taxon, rows);
    table.sort_descending();

    tracing::debug!(
        "CV: {} potential uses, {} informants -> {} taxa",
        potential_uses,
        n_informants,
        table.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_cv_six_row_scenario() {
        // Uce = 1/3 for all; Ice = IUce = 1, 2/3, 1/3
        let cv = calculate_cv(&fixtures::six_row_table(), &ColumnRoles::default()).unwrap();

        let taxa: Vec<&str> = cv.rows.iter().map(|r| r.taxon.as_str()).collect();
        assert_eq!(taxa, vec!["Species1", "Species2", "Species3"]);
        assert_relative_eq!(cv.rows[0].value, 0.333333, epsilon = 1e-6);
        assert_relative_eq!(cv.rows[1].value, 0.148148, epsilon = 1e-6);
        assert_relative_eq!(cv.rows[2].value, 0.037037, epsilon = 1e-6);
    }

    #[test]
    fn test_cv_one_row_per_taxon() {
        let cv = calculate_cv(&fixtures::four_row_table(), &ColumnRoles::default()).unwrap();
        assert_eq!(cv.len(), 3);
    }
}
