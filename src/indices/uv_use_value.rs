//! UV: Use Value
//!
//! Two-stage grouping:
//! 1. Count reports per (informant, taxon) pair: `U_is`
//! 2. Per taxon, count the pairs (informants citing it) and sum `U_is`
//!
//! `UV = pairs / N`, with `N` the number of distinct informants in the table.
//! Repeat reports by one informant add to `reports` but never to UV.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{count_informants, ratio, TaxonIndex, TaxonIndexTable, TaxonScore};
use crate::utils::{GroupIndex, KeyColumns};
use polars::prelude::*;
use serde::Serialize;

/// UV with its stage-2 aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseValueRow {
    pub taxon: String,
    /// Informants who cited the taxon (distinct informant/taxon pairs)
    pub informants: usize,
    /// Σ U_is over those informants
    pub reports: usize,
    pub uv: f64,
}

/// Calculate UV per taxon with pair and report counts, sorted descending by UV
pub fn calculate_uv_detailed(df: &DataFrame, roles: &ColumnRoles) -> Result<Vec<UseValueRow>> {
    let keys = KeyColumns::for_roles(df, roles, &[&roles.informant, &roles.taxon], "UV")?;
    let n_informants = count_informants(df, roles, "UV")?;

    // Stage 1: reports per (informant, taxon)
    let mut pairs: GroupIndex<(&str, &str)> = GroupIndex::new();
    let mut pair_reports: Vec<usize> = Vec::new();
    for row in keys.rows() {
        let slot = pairs.slot((row[0], row[1]));
        if slot == pair_reports.len() {
            pair_reports.push(0);
        }
        pair_reports[slot] += 1;
    }

    // Stage 2: per taxon
    let mut taxa = GroupIndex::new();
    let mut per_taxon: Vec<(usize, usize)> = Vec::new();
    for (&(_, taxon), &reports) in pairs.keys().iter().zip(&pair_reports) {
        let slot = taxa.slot(taxon);
        if slot == per_taxon.len() {
            per_taxon.push((0, 0));
        }
        per_taxon[slot].0 += 1;
        per_taxon[slot].1 += reports;
    }

    let mut rows: Vec<UseValueRow> = taxa
        .keys()
        .iter()
        .zip(per_taxon)
        .map(|(taxon, (informants, reports))| UseValueRow {
            taxon: taxon.to_string(),
            informants,
            reports,
            uv: ratio(informants as f64, n_informants as f64),
        })
        .collect();
    rows.sort_by(|a, b| b.uv.total_cmp(&a.uv));

    tracing::debug!(
        "UV: {} informant/taxon pairs, {} informants -> {} taxa",
        pairs.len(),
        n_informants,
        rows.len()
    );
    Ok(rows)
}

/// Calculate UV per taxon, sorted descending
pub fn calculate_uv(df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
    let rows = calculate_uv_detailed(df, roles)?
        .into_iter()
        .map(|row| TaxonScore {
            taxon: row.taxon,
            value: row.uv,
        })
        .collect();
    Ok(TaxonIndexTable::new(TaxonIndex::Uv, &roles.taxon, rows))
}
