//! RI: Relative Importance
//!
//! `RI = (RFC / max(RFC) + NU / max(NU)) / 2`
//!
//! Both components are normalized against the dataset maximum, so RI lies in
//! [0, 1] and the taxon holding both maxima scores exactly 1. A zero maximum
//! (possible only for an empty table) contributes 0 instead of NaN.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{calculate_nu, calculate_rfc, ratio, TaxonIndex, TaxonIndexTable, TaxonScore};
use polars::prelude::*;

/// Calculate RI per taxon, sorted descending
pub fn calculate_ri(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let rfc = calculate_rfc(df, roles)?;
    let nu = calculate_nu(df, roles)?;

    let max_rfc = rfc.max_value().unwrap_or(0.0);
    let max_nu = nu.max_value().unwrap_or(0.0);
    let nu_by_taxon = nu.to_map();

    let rows = rfc
        .rows
        .iter()
        .filter_map(|row| {
            let nu_value = *nu_by_taxon.get(row.taxon.as_str())?;
            let rfc_max = ratio(row.value, max_rfc);
            let rnu_max = ratio(nu_value, max_nu);
            Some(TaxonScore {
                taxon: row.taxon.clone(),
                value: (rfc_max + rnu_max) / 2.0,
            })
        })
        .collect();

    let mut table = TaxonIndexTable::new(TaxonIndex::Ri, &roles.taxon, rows);
    table.sort_descending();

    tracing::debug!("RI: max RFC {:.4}, max NU {} -> {} taxa", max_rfc, max_nu, table.len());
    Ok(table)
}
