//! CI: Cultural Importance
//!
//! `CI = UR / N`, where `N` is the number of distinct informants in the table.
//! UR is joined with the per-taxon informant count so that only taxa with at
//! least one identified informant are reported.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{calculate_fc, calculate_ur, count_informants, ratio, TaxonIndex, TaxonIndexTable, TaxonScore};
use polars::prelude::*;

/// Calculate CI per taxon (UR order: descending by use reports)
pub fn calculate_ci(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let ur = calculate_ur(df, roles)?;
    let informants_per_taxon = calculate_fc(df, roles)?;
    let n_informants = count_informants(df, roles, "CI")? as f64;

    let cited = informants_per_taxon.to_map();
    let rows = ur
        .rows
        .iter()
        .filter(|row| cited.contains_key(row.taxon.as_str()))
        .map(|row| TaxonScore {
            taxon: row.taxon.clone(),
            value: ratio(row.value, n_informants),
        })
        .collect();

    Ok(TaxonIndexTable::new(TaxonIndex::Ci, &roles.taxon, rows))
}
