//! RFC: Relative Frequency of Citation
//!
//! `RFC = FC / N`. Ranges over [0, 1]; 1 means every informant cited the taxon.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{calculate_fc, count_informants, ratio, TaxonIndex, TaxonIndexTable, TaxonScore};
use polars::prelude::*;

/// Calculate RFC per taxon (FC order)
pub fn calculate_rfc(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let fc = calculate_fc(df, roles)?;
    let n_informants = count_informants(df, roles, "RFC")? as f64;

    let rows = fc
        .rows
        .into_iter()
        .map(|row| TaxonScore {
            value: ratio(row.value, n_informants),
            taxon: row.taxon,
        })
        .collect();

    Ok(TaxonIndexTable::new(TaxonIndex::Rfc, &roles.taxon, rows))
}
