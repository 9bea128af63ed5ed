//! Ethnobotanical index calculators
//!
//! Each index lives in its own module. Primitive aggregators (FC, NU, UR, UV)
//! are single-pass group counts over the observation table; derived indices
//! (CI, RFC, RI, CV, FL, FIC) recompute the primitives they need on every call
//! and combine them by taxon.
//!
//! All calculators are free functions of `(&DataFrame, &ColumnRoles)`. They
//! never mutate the table, hold no state and can run in any order or in
//! parallel.

pub mod fc_frequency_of_citation;
pub mod nu_number_of_uses;
pub mod ur_use_reports;
pub mod uv_use_value;
pub mod ci_cultural_importance;
pub mod rfc_relative_frequency;
pub mod ri_relative_importance;
pub mod cv_cultural_value;
pub mod fl_fidelity_level;
pub mod fic_informant_consensus;

pub use fc_frequency_of_citation::calculate_fc;
pub use nu_number_of_uses::calculate_nu;
pub use ur_use_reports::calculate_ur;
pub use uv_use_value::{calculate_uv, calculate_uv_detailed, UseValueRow};
pub use ci_cultural_importance::calculate_ci;
pub use rfc_relative_frequency::calculate_rfc;
pub use ri_relative_importance::calculate_ri;
pub use cv_cultural_value::calculate_cv;
pub use fl_fidelity_level::{calculate_fl, FidelityRow, FidelityTable};
pub use fic_informant_consensus::{calculate_fic, ConsensusRow, ConsensusTable};

use crate::config::ColumnRoles;
use crate::error::{EthnoError, Result};
use crate::utils::KeyColumns;
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Taxon-keyed indices (one value per taxon)
///
/// FL and FIC are keyed differently and have their own result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxonIndex {
    Ci,
    Fc,
    Nu,
    Ur,
    Rfc,
    Ri,
    Uv,
    Cv,
}

impl TaxonIndex {
    /// Default composition order for "all taxon indices"
    pub const ALL: [TaxonIndex; 8] = [
        TaxonIndex::Ci,
        TaxonIndex::Fc,
        TaxonIndex::Nu,
        TaxonIndex::Ur,
        TaxonIndex::Rfc,
        TaxonIndex::Ri,
        TaxonIndex::Uv,
        TaxonIndex::Cv,
    ];

    /// Column name used in result tables
    pub fn short_name(self) -> &'static str {
        match self {
            TaxonIndex::Ci => "CI",
            TaxonIndex::Fc => "FC",
            TaxonIndex::Nu => "NU",
            TaxonIndex::Ur => "UR",
            TaxonIndex::Rfc => "RFC",
            TaxonIndex::Ri => "RI",
            TaxonIndex::Uv => "UV",
            TaxonIndex::Cv => "CV",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TaxonIndex::Ci => "Cultural Importance (CI) Index",
            TaxonIndex::Fc => "Frequency of Citation (FC) per Species",
            TaxonIndex::Nu => "Number of Uses (NU) per Species",
            TaxonIndex::Ur => "Use Report (UR) per Species",
            TaxonIndex::Rfc => "Relative Frequency of Citation (RFC) per Species",
            TaxonIndex::Ri => "Relative Importance (RI) Index per Species",
            TaxonIndex::Uv => "Use Value (UV) per Species",
            TaxonIndex::Cv => "Cultural Value (CV) for Ethnospecies",
        }
    }

    /// Default CSV file name for export
    pub fn file_name(self) -> &'static str {
        match self {
            TaxonIndex::Ci => "cultural_importance_CI.csv",
            TaxonIndex::Fc => "frequency_of_citation_FC.csv",
            TaxonIndex::Nu => "number_of_uses_NU.csv",
            TaxonIndex::Ur => "use_report_UR.csv",
            TaxonIndex::Rfc => "relative_frequency_of_citation_RFC.csv",
            TaxonIndex::Ri => "relative_importance_RI.csv",
            TaxonIndex::Uv => "use_value_UV.csv",
            TaxonIndex::Cv => "cultural_value_CV.csv",
        }
    }

    /// Integer-valued indices (rendered as UInt32 columns)
    pub fn is_count(self) -> bool {
        matches!(self, TaxonIndex::Fc | TaxonIndex::Nu | TaxonIndex::Ur)
    }

    /// Compute this index from scratch
    pub fn calculate(self, df: &DataFrame, roles: &ColumnRoles) -> Result<TaxonIndexTable> {
        match self {
            TaxonIndex::Ci => calculate_ci(df, roles),
            TaxonIndex::Fc => calculate_fc(df, roles),
            TaxonIndex::Nu => calculate_nu(df, roles),
            TaxonIndex::Ur => calculate_ur(df, roles),
            TaxonIndex::Rfc => calculate_rfc(df, roles),
            TaxonIndex::Ri => calculate_ri(df, roles),
            TaxonIndex::Uv => calculate_uv(df, roles),
            TaxonIndex::Cv => calculate_cv(df, roles),
        }
    }
}

impl fmt::Display for TaxonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for TaxonIndex {
    type Err = EthnoError;

    fn from_str(s: &str) -> Result<Self> {
        TaxonIndex::ALL
            .iter()
            .copied()
            .find(|index| index.short_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EthnoError::UnknownIndex(s.to_string()))
    }
}

/// One taxon's value for a single index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonScore {
    pub taxon: String,
    pub value: f64,
}

/// Result of a taxon-keyed calculator: one row per distinct taxon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonIndexTable {
    pub index: TaxonIndex,
    /// Name of the taxon column in the source table (reused on export)
    pub taxon_column: String,
    pub rows: Vec<TaxonScore>,
}

impl TaxonIndexTable {
    pub fn new(index: TaxonIndex, taxon_column: &str, rows: Vec<TaxonScore>) -> Self {
        Self {
            index,
            taxon_column: taxon_column.to_string(),
            rows,
        }
    }

    pub(crate) fn from_counts(index: TaxonIndex, taxon_column: &str, counts: Vec<(&str, usize)>) -> Self {
        let rows = counts
            .into_iter()
            .map(|(taxon, count)| TaxonScore {
                taxon: taxon.to_string(),
                value: count as f64,
            })
            .collect();
        Self::new(index, taxon_column, rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, taxon: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.taxon == taxon).map(|r| r.value)
    }

    /// Taxon → value lookup
    pub fn to_map(&self) -> FxHashMap<&str, f64> {
        self.rows.iter().map(|r| (r.taxon.as_str(), r.value)).collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.value).reduce(f64::max)
    }

    /// Stable descending sort by value (ties keep their current order)
    pub fn sort_descending(&mut self) {
        self.rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    }

    /// Two-column frame: `<taxon_column>`, `<index short name>`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let taxa: Vec<&str> = self.rows.iter().map(|r| r.taxon.as_str()).collect();
        let name = self.index.short_name();

        let values = if self.index.is_count() {
            let counts: Vec<u32> = self.rows.iter().map(|r| r.value as u32).collect();
            Column::new(name.into(), counts)
        } else {
            let ratios: Vec<f64> = self.rows.iter().map(|r| r.value).collect();
            Column::new(name.into(), ratios)
        };

        let df = DataFrame::new(vec![
            Column::new(self.taxon_column.as_str().into(), taxa),
            values,
        ])?;
        Ok(df)
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Number of distinct informants in the whole table
pub(crate) fn count_informants(df: &DataFrame, roles: &ColumnRoles, context: &str) -> Result<usize> {
    count_distinct(df, roles, &roles.informant, context)
}

/// Number of distinct non-null values in one role column
pub(crate) fn count_distinct(
    df: &DataFrame,
    roles: &ColumnRoles,
    column: &str,
    context: &str,
) -> Result<usize> {
    let keys = KeyColumns::for_roles(df, roles, &[column], context)?;
    let distinct: FxHashSet<&str> = keys.rows().map(|row| row[0]).collect();
    Ok(distinct.len())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_names() {
        assert_eq!("rfc".parse::<TaxonIndex>().unwrap(), TaxonIndex::Rfc);
        assert_eq!(" CV ".parse::<TaxonIndex>().unwrap(), TaxonIndex::Cv);
        assert!(matches!("FL".parse::<TaxonIndex>(), Err(EthnoError::UnknownIndex(_))));
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn test_count_table_renders_integer_column() {
        let table = TaxonIndexTable::from_counts(TaxonIndex::Fc, "taxon", vec![("s1", 2), ("s2", 1)]);
        let df = table.to_dataframe().unwrap();

        assert_eq!(df.width(), 2);
        assert!(df.column("taxon").is_ok());
        assert_eq!(df.column("FC").unwrap().dtype(), &DataType::UInt32);
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut table = TaxonIndexTable::from_counts(
            TaxonIndex::Ur,
            "taxon",
            vec![("a", 1), ("b", 3), ("c", 1), ("d", 3)],
        );
        table.sort_descending();
        let order: Vec<&str> = table.rows.iter().map(|r| r.taxon.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }
}
