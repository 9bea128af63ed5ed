//! FC: Frequency of Citation
//!
//! Number of distinct informants who cited a taxon for any use.
//! Feeds RFC, CV and FL.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{TaxonIndex, TaxonIndexTable};
use crate::utils::{DistinctCounter, KeyColumns};
use polars::prelude::*;

/// Calculate FC per taxon, sorted descending (ties in encounter order)
pub fn calculate_fc(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.taxon, &roles.informant], "FC")?;

    let mut informants = DistinctCounter::new();
    for row in keys.rows() {
        informants.add(row[0], row[1]);
    }

    let mut table = TaxonIndexTable::from_counts(TaxonIndex::Fc, &roles.taxon, informants.into_counts());
    table.sort_descending();

    tracing::debug!("FC: {} rows -> {} taxa", keys.height(), table.len());
    Ok(table)
}
