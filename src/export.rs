//! CSV export of result tables
//!
//! Each writer builds the table's frame and writes it with a header row and
//! no index column. Per-table writers place the file under `dir` with the
//! table's default file name and return the written path.

use crate::composition::ComposedIndexTable;
use crate::error::Result;
use crate::indices::{ConsensusTable, FidelityTable, TaxonIndexTable};
use crate::similarity::SimilarityTable;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const FIDELITY_LEVEL_FILE: &str = "fidelity_level_FL.csv";
pub const CONSENSUS_FACTOR_FILE: &str = "informant_consensus_factor_FIC.csv";
pub const ALL_TAXON_INDICES_FILE: &str = "all_taxon_indices.csv";
pub const JACCARD_SIMILARITY_FILE: &str = "jaccard_similarity.csv";

/// Write `df` to `path` as CSV, creating parent directories as needed
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    tracing::debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

fn write_into(mut df: DataFrame, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    write_csv(&mut df, &path)?;
    Ok(path)
}

pub fn write_taxon_index(table: &TaxonIndexTable, dir: &Path) -> Result<PathBuf> {
    write_into(table.to_dataframe()?, dir, table.index.file_name())
}

pub fn write_fidelity_level(table: &FidelityTable, dir: &Path) -> Result<PathBuf> {
    write_into(table.to_dataframe()?, dir, FIDELITY_LEVEL_FILE)
}

pub fn write_consensus_factor(table: &ConsensusTable, dir: &Path) -> Result<PathBuf> {
    write_into(table.to_dataframe()?, dir, CONSENSUS_FACTOR_FILE)
}

pub fn write_composed(table: &ComposedIndexTable, dir: &Path) -> Result<PathBuf> {
    write_into(table.to_dataframe()?, dir, ALL_TAXON_INDICES_FILE)
}

pub fn write_similarity(table: &SimilarityTable, dir: &Path) -> Result<PathBuf> {
    write_into(table.to_dataframe()?, dir, JACCARD_SIMILARITY_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{TaxonIndex, TaxonScore};
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("ethno_indices_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_taxon_index_written_with_default_name() {
        let dir = scratch_dir("fc");
        let table = TaxonIndexTable::new(
            TaxonIndex::Fc,
            "taxon",
            vec![TaxonScore { taxon: "Species1".into(), value: 2.0 }],
        );

        let path = write_taxon_index(&table, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "frequency_of_citation_FC.csv");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["taxon,FC", "Species1,2"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_similarity_header() {
        let dir = scratch_dir("jaccard");
        let path = write_similarity(&SimilarityTable::default(), &dir).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().next(), Some("study,similarity"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
