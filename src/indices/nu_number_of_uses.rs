//! NU: Number of Uses
//!
//! Number of distinct use labels recorded for a taxon.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{TaxonIndex, TaxonIndexTable};
use crate::utils::{DistinctCounter, KeyColumns};
use polars::prelude::*;

/// Calculate NU per taxon, sorted descending
pub fn calculate_nu(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.taxon, &roles.use_label], "NU")?;

    let mut uses = DistinctCounter::new();
    for row in keys.rows() {
        uses.add(row[0], row[1]);
    }

    let mut table = TaxonIndexTable::from_counts(TaxonIndex::Nu, &roles.taxon, uses.into_counts());
    table.sort_descending();

    tracing::debug!("NU: {} rows -> {} taxa", keys.height(), table.len());
    Ok(table)
}
