//! Key column projection with validation
//!
//! Every calculator reads its informant/taxon/use columns through
//! `KeyColumns`, which checks that the configured columns exist, casts them
//! to strings (informant IDs are often numeric in survey CSVs) and iterates
//! rows whose keys are all present.

use crate::config::ColumnRoles;
use crate::error::{EthnoError, Result};
use polars::prelude::*;
use smallvec::SmallVec;

/// Fail with `MissingColumns` if any of `columns` is absent from `df`
///
/// All missing names are reported together, in the order given.
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> Result<()> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|name| df.get_column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EthnoError::missing_columns(context, missing))
    }
}

/// Cast a column to `String` dtype
pub fn string_column(df: &DataFrame, name: &str, context: &str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .map_err(|_| EthnoError::missing_columns(context, vec![name.to_string()]))?;
    let casted = column.cast(&DataType::String)?;
    Ok(casted.str()?.clone())
}

/// String views of a fixed set of key columns
pub struct KeyColumns {
    columns: Vec<StringChunked>,
    height: usize,
}

impl KeyColumns {
    /// Validate all role columns, then project `columns` (in that order)
    ///
    /// # Errors
    /// `MissingColumns` naming every configured role column absent from `df`.
    pub fn for_roles(
        df: &DataFrame,
        roles: &ColumnRoles,
        columns: &[&str],
        context: &str,
    ) -> Result<Self> {
        require_columns(df, &roles.required(), context)?;
        Self::materialize(df, columns, context)
    }

    /// Project `columns` without the role check
    pub fn materialize(df: &DataFrame, columns: &[&str], context: &str) -> Result<Self> {
        require_columns(df, columns, context)?;

        let columns = columns
            .iter()
            .map(|name| string_column(df, name, context))
            .collect::<Result<Vec<_>>>()?;

        let keys = KeyColumns {
            columns,
            height: df.height(),
        };

        if keys.columns.iter().any(|c| c.null_count() > 0) {
            let skipped = keys.height - keys.rows().count();
            tracing::warn!("{}: skipping {} rows with null key values", context, skipped);
        }

        Ok(keys)
    }

    /// Rows where every projected key is non-null, in table order
    pub fn rows(&self) -> impl Iterator<Item = SmallVec<[&str; 4]>> + '_ {
        self.indexed_rows().map(|(_, row)| row)
    }

    /// Like `rows`, paired with the row's position in the source table
    pub fn indexed_rows(&self) -> impl Iterator<Item = (usize, SmallVec<[&str; 4]>)> + '_ {
        (0..self.height).filter_map(move |idx| {
            let mut row = SmallVec::new();
            for column in &self.columns {
                row.push(column.get(idx)?);
            }
            Some((idx, row))
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
