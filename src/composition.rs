//! Index Composition - merges taxon-keyed indices into one wide table
//!
//! Each requested index is computed independently from the observation table,
//! then the results are outer-joined on taxon. Taxa missing from one index get
//! a null cell for it, never a zero. Includes both sequential and parallel
//! (Rayon) implementations; they produce identical tables.

use crate::config::ColumnRoles;
use crate::error::Result;
use crate::indices::{TaxonIndex, TaxonIndexTable, TaxonScore};
use crate::utils::GroupIndex;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// Sort request for a composed table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub by: TaxonIndex,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(by: TaxonIndex) -> Self {
        Self { by, descending: false }
    }

    pub fn descending(by: TaxonIndex) -> Self {
        Self { by, descending: true }
    }
}

/// One taxon with a cell per composed index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedRow {
    pub taxon: String,
    pub values: Vec<Option<f64>>,
}

/// Wide table keyed by taxon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedIndexTable {
    pub taxon_column: String,
    pub indices: Vec<TaxonIndex>,
    pub rows: Vec<ComposedRow>,
}

impl ComposedIndexTable {
    /// Outer-join standalone tables on taxon, in the order given
    ///
    /// Taxa appear in first-seen order: the first table's rows, then any new
    /// taxa from each later table.
    pub fn merge(taxon_column: &str, tables: &[TaxonIndexTable]) -> Self {
        let mut taxa: GroupIndex<&str> = GroupIndex::new();
        for table in tables {
            for row in &table.rows {
                taxa.slot(row.taxon.as_str());
            }
        }

        let mut cells = vec![vec![None; tables.len()]; taxa.len()];
        for (col_idx, table) in tables.iter().enumerate() {
            for row in &table.rows {
                if let Some(slot) = taxa.get(&row.taxon.as_str()) {
                    cells[slot][col_idx] = Some(row.value);
                }
            }
        }

        let rows = taxa
            .keys()
            .iter()
            .zip(cells)
            .map(|(taxon, values)| ComposedRow {
                taxon: taxon.to_string(),
                values,
            })
            .collect();

        Self {
            taxon_column: taxon_column.to_string(),
            indices: tables.iter().map(|t| t.index).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, index: TaxonIndex) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    /// Cell lookup; `None` if the taxon or index is absent or the cell is null
    pub fn value(&self, taxon: &str, index: TaxonIndex) -> Option<f64> {
        let col = self.position(index)?;
        self.rows
            .iter()
            .find(|r| r.taxon == taxon)
            .and_then(|r| r.values[col])
    }

    /// Stable sort on one index column; nulls always last
    pub fn sort_by(&mut self, spec: SortSpec) {
        let Some(col) = self.position(spec.by) else {
            tracing::warn!("sort column {} not in composed table; order unchanged", spec.by);
            return;
        };

        self.rows.sort_by(|a, b| match (a.values[col], b.values[col]) {
            (Some(x), Some(y)) => {
                if spec.descending {
                    y.total_cmp(&x)
                } else {
                    x.total_cmp(&y)
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    /// Extract one index column back into a standalone-shaped table
    ///
    /// Null cells are dropped; rows keep the composed order.
    pub fn split(&self, index: TaxonIndex) -> Option<TaxonIndexTable> {
        let col = self.position(index)?;
        let rows = self
            .rows
            .iter()
            .filter_map(|r| {
                r.values[col].map(|value| TaxonScore {
                    taxon: r.taxon.clone(),
                    value,
                })
            })
            .collect();
        Some(TaxonIndexTable::new(index, &self.taxon_column, rows))
    }

    /// Wide frame with nullable index columns
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let taxa: Vec<&str> = self.rows.iter().map(|r| r.taxon.as_str()).collect();
        let mut columns = vec![Column::new(self.taxon_column.as_str().into(), taxa)];

        for (col, index) in self.indices.iter().enumerate() {
            let name = index.short_name();
            let column = if index.is_count() {
                let counts: Vec<Option<u32>> = self
                    .rows
                    .iter()
                    .map(|r| r.values[col].map(|v| v as u32))
                    .collect();
                Column::new(name.into(), counts)
            } else {
                let ratios: Vec<Option<f64>> = self.rows.iter().map(|r| r.values[col]).collect();
                Column::new(name.into(), ratios)
            };
            columns.push(column);
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Compute `indices` one after another and merge them
pub fn compose_indices(
    df: &DataFrame,
    roles: &ColumnRoles,
    indices: &[TaxonIndex],
    sort: Option<SortSpec>,
) -> Result<ComposedIndexTable> {
    let tables = indices
        .iter()
        .map(|index| index.calculate(df, roles))
        .collect::<Result<Vec<_>>>()?;

    Ok(finish(roles, &tables, sort))
}

/// Compute `indices` concurrently on the Rayon pool and merge them
///
/// Every calculator reads the table immutably, so results match
/// `compose_indices` exactly.
pub fn compose_indices_parallel(
    df: &DataFrame,
    roles: &ColumnRoles,
    indices: &[TaxonIndex],
    sort: Option<SortSpec>,
) -> Result<ComposedIndexTable> {
    let tables = indices
        .par_iter()
        .map(|index| index.calculate(df, roles))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    Ok(finish(roles, &tables, sort))
}

/// All eight taxon indices in the default order (CI, FC, NU, UR, RFC, RI, UV, CV)
pub fn all_taxon_indices(
    df: &DataFrame,
    roles: &ColumnRoles,
    sort: Option<SortSpec>,
) -> Result<ComposedIndexTable> {
    compose_indices(df, roles, &TaxonIndex::ALL, sort)
}

fn finish(roles: &ColumnRoles, tables: &[TaxonIndexTable], sort: Option<SortSpec>) -> ComposedIndexTable {
    let mut composed = ComposedIndexTable::merge(&roles.taxon, tables);
    if let Some(spec) = sort {
        composed.sort_by(spec);
    }
    tracing::debug!(
        "Composed {} indices over {} taxa",
        composed.indices.len(),
        composed.len()
    );
    composed
}
