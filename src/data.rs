//! Observation table loading and validation
//!
//! `ObservationTable` is the hand-off point between ingestion and the index
//! calculators: once constructed, the configured informant, taxon and use
//! columns are known to exist. Loaders cover CSV (NA -> null), Parquet, wide
//! 0/1 use matrices and in-memory records.

use crate::composition::{self, ComposedIndexTable, SortSpec};
use crate::config::ColumnRoles;
use crate::error::{EthnoError, Result};
use crate::indices::{self, ConsensusTable, FidelityTable, TaxonIndex, TaxonIndexTable};
use crate::similarity::{self, PresenceMatrix, SimilarityOptions, SimilarityTable};
use crate::utils::{require_columns, string_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One plant-use report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub informant: String,
    pub taxon: String,
    pub use_label: String,
    #[serde(default)]
    pub literature: Option<String>,
}

impl Observation {
    pub fn new(informant: &str, taxon: &str, use_label: &str) -> Self {
        Self {
            informant: informant.to_string(),
            taxon: taxon.to_string(),
            use_label: use_label.to_string(),
            literature: None,
        }
    }

    pub fn with_literature(mut self, literature: &str) -> Self {
        self.literature = Some(literature.to_string());
        self
    }
}

/// Validated observation table plus its column roles
#[derive(Debug, Clone)]
pub struct ObservationTable {
    df: DataFrame,
    roles: ColumnRoles,
}

impl ObservationTable {
    /// Wrap `df`, failing if any informant/taxon/use column is missing
    pub fn new(df: DataFrame, roles: ColumnRoles) -> Result<Self> {
        require_columns(&df, &roles.required(), "Observation table")?;
        tracing::info!(
            "Observation table: {} rows x {} columns",
            df.height(),
            df.width()
        );
        Ok(Self { df, roles })
    }

    /// Load a headered CSV; `NA` cells become nulls
    pub fn from_csv(path: impl AsRef<Path>, roles: ColumnRoles) -> Result<Self> {
        let path = path.as_ref();
        let parse_options = CsvParseOptions::default()
            .with_null_values(Some(NullValues::AllColumnsSingle("NA".into())));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        tracing::info!("Loaded {} rows from {}", df.height(), path.display());
        Self::new(df, roles)
    }

    pub fn from_parquet(path: impl AsRef<Path>, roles: ColumnRoles) -> Result<Self> {
        let path = path.as_ref();
        let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;

        tracing::info!("Loaded {} rows from {}", df.height(), path.display());
        Self::new(df, roles)
    }

    /// Convert wide use data into long form
    ///
    /// Every column other than informant and taxon is a use label; each cell
    /// equal to 1 becomes one `(informant, taxon, use)` row. Rows are sorted by
    /// informant, then taxon.
    pub fn from_use_matrix(df: &DataFrame, roles: ColumnRoles) -> Result<Self> {
        let context = "Use matrix";
        require_columns(df, &[&roles.informant, &roles.taxon], context)?;

        let informants = string_column(df, &roles.informant, context)?;
        let taxa = string_column(df, &roles.taxon, context)?;

        let mut use_columns: Vec<(String, Float64Chunked)> = Vec::new();
        for column in df.get_columns() {
            let name = column.name().as_str();
            if name == roles.informant || name == roles.taxon {
                continue;
            }
            let values = column.cast(&DataType::Float64)?.f64()?.clone();
            use_columns.push((name.to_string(), values));
        }

        let mut long: Vec<(&str, &str, &str)> = Vec::new();
        for idx in 0..df.height() {
            let (Some(informant), Some(taxon)) = (informants.get(idx), taxa.get(idx)) else {
                continue;
            };
            for (use_label, values) in &use_columns {
                if values.get(idx) == Some(1.0) {
                    long.push((informant, taxon, use_label.as_str()));
                }
            }
        }
        long.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        tracing::info!(
            "Use matrix: {} rows x {} use columns -> {} reports",
            df.height(),
            use_columns.len(),
            long.len()
        );

        let long_df = DataFrame::new(vec![
            Column::new(roles.informant.as_str().into(), long.iter().map(|r| r.0).collect::<Vec<_>>()),
            Column::new(roles.taxon.as_str().into(), long.iter().map(|r| r.1).collect::<Vec<_>>()),
            Column::new(roles.use_label.as_str().into(), long.iter().map(|r| r.2).collect::<Vec<_>>()),
        ])?;
        Self::new(long_df, roles)
    }

    /// Build from in-memory records; literature is written to the configured column
    pub fn from_records(records: &[Observation], roles: ColumnRoles) -> Result<Self> {
        if records.is_empty() {
            return Err(EthnoError::EmptyTable {
                context: "Observation records".to_string(),
            });
        }

        let informants: Vec<&str> = records.iter().map(|r| r.informant.as_str()).collect();
        let taxa: Vec<&str> = records.iter().map(|r| r.taxon.as_str()).collect();
        let uses: Vec<&str> = records.iter().map(|r| r.use_label.as_str()).collect();
        let literature: Vec<Option<&str>> = records.iter().map(|r| r.literature.as_deref()).collect();

        let df = DataFrame::new(vec![
            Column::new(roles.informant.as_str().into(), informants),
            Column::new(roles.taxon.as_str().into(), taxa),
            Column::new(roles.use_label.as_str().into(), uses),
            Column::new(roles.literature.as_str().into(), literature),
        ])?;
        Self::new(df, roles)
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn index(&self, index: TaxonIndex) -> Result<TaxonIndexTable> {
        index.calculate(&self.df, &self.roles)
    }

    pub fn frequency_of_citation(&self) -> Result<TaxonIndexTable> {
        indices::calculate_fc(&self.df, &self.roles)
    }

    pub fn number_of_uses(&self) -> Result<TaxonIndexTable> {
        indices::calculate_nu(&self.df, &self.roles)
    }

    pub fn use_reports(&self) -> Result<TaxonIndexTable> {
        indices::calculate_ur(&self.df, &self.roles)
    }

    pub fn use_value(&self) -> Result<TaxonIndexTable> {
        indices::calculate_uv(&self.df, &self.roles)
    }

    pub fn cultural_importance(&self) -> Result<TaxonIndexTable> {
        indices::calculate_ci(&self.df, &self.roles)
    }

    pub fn relative_frequency_of_citation(&self) -> Result<TaxonIndexTable> {
        indices::calculate_rfc(&self.df, &self.roles)
    }

    pub fn relative_importance(&self) -> Result<TaxonIndexTable> {
        indices::calculate_ri(&self.df, &self.roles)
    }

    pub fn cultural_value(&self) -> Result<TaxonIndexTable> {
        indices::calculate_cv(&self.df, &self.roles)
    }

    pub fn fidelity_level(&self) -> Result<FidelityTable> {
        indices::calculate_fl(&self.df, &self.roles)
    }

    pub fn informant_consensus_factor(&self) -> Result<ConsensusTable> {
        indices::calculate_fic(&self.df, &self.roles)
    }

    pub fn compose(&self, indices: &[TaxonIndex], sort: Option<SortSpec>) -> Result<ComposedIndexTable> {
        composition::compose_indices(&self.df, &self.roles, indices, sort)
    }

    pub fn all_taxon_indices(&self, sort: Option<SortSpec>) -> Result<ComposedIndexTable> {
        composition::all_taxon_indices(&self.df, &self.roles, sort)
    }

    pub fn presence_matrix(&self, delimiter: char) -> Result<PresenceMatrix> {
        similarity::convert_observations(&self.df, &self.roles, delimiter)
    }

    pub fn jaccard(&self, options: &SimilarityOptions) -> Result<SimilarityTable> {
        similarity::run_analysis(&self.df, &self.roles, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reports_missing_columns() {
        let df = df![
            "informant" => &["A"],
            "plant" => &["s1"],
        ]
        .unwrap();

        let err = ObservationTable::new(df, ColumnRoles::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Observation table: Missing required columns: taxon, ailments_treated"
        );
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            Observation::new("A", "s1", "Fever").with_literature("R1"),
            Observation::new("B", "s2", "Cough"),
        ];
        let table = ObservationTable::from_records(&records, ColumnRoles::default()).unwrap();

        assert_eq!(table.height(), 2);
        let literature = table.df().column("literature").unwrap();
        assert_eq!(literature.null_count(), 1);
    }

    #[test]
    fn test_from_records_rejects_empty() {
        let err = ObservationTable::from_records(&[], ColumnRoles::default()).unwrap_err();
        assert!(matches!(err, EthnoError::EmptyTable { .. }));
    }

    #[test]
    fn test_use_matrix_to_long_form() {
        let wide = df![
            "informant" => &["B", "A", "A"],
            "taxon" => &["s1", "s2", "s1"],
            "Fever" => &[1i32, 0, 1],
            "Cough" => &[1i32, 1, 0],
        ]
        .unwrap();

        let table = ObservationTable::from_use_matrix(&wide, ColumnRoles::default()).unwrap();
        let df = table.df();
        assert_eq!(df.height(), 4);

        let rows: Vec<(String, String, String)> = (0..df.height())
            .map(|i| {
                let get = |name: &str| df.column(name).unwrap().str().unwrap().get(i).unwrap().to_string();
                (get("informant"), get("taxon"), get("ailments_treated"))
            })
            .collect();

        assert_eq!(rows[0], ("A".into(), "s1".into(), "Fever".into()));
        assert_eq!(rows[1], ("A".into(), "s2".into(), "Cough".into()));
        assert_eq!(rows[2], ("B".into(), "s1".into(), "Fever".into()));
        assert_eq!(rows[3], ("B".into(), "s1".into(), "Cough".into()));
    }

    #[test]
    fn test_use_matrix_requires_informant_and_taxon_only() {
        let wide = df![
            "informant" => &["A"],
            "Fever" => &[1i32],
        ]
        .unwrap();

        let err = ObservationTable::from_use_matrix(&wide, ColumnRoles::default()).unwrap_err();
        match err {
            EthnoError::MissingColumns { columns, .. } => assert_eq!(columns, vec!["taxon".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
