//! Compute every index for one observation table and write the CSVs
//!
//! Usage: ethno_indices <observations.csv|.parquet> [config.json]
//!
//! Log filtering follows `ETHNO_LOG` (default `ethno_indices=info`).

use anyhow::{bail, Context, Result};
use ethno_indices::composition::SortSpec;
use ethno_indices::{export, AnalysisConfig, ObservationTable, SimilarityOptions, TaxonIndex};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ETHNO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("ethno_indices=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_table(path: &Path, config: &AnalysisConfig) -> Result<ObservationTable> {
    let roles = config.roles.clone();
    let table = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => ObservationTable::from_parquet(path, roles),
        _ => ObservationTable::from_csv(path, roles),
    };
    table.with_context(|| format!("Failed to load observations: {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: {} <observations.csv|.parquet> [config.json]", args[0]);
    }

    let config = match args.get(2) {
        Some(path) => AnalysisConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => AnalysisConfig::default(),
    };
    let out_dir = config.output_dir.as_path();

    let total_start = Instant::now();
    let table = load_table(Path::new(&args[1]), &config)?;

    println!("\n{}", "=".repeat(70));
    println!("ETHNOBOTANICAL INDICES");
    println!("{}", "=".repeat(70));
    println!("Observations: {}", table.height());

    for index in TaxonIndex::ALL {
        let result = table
            .index(index)
            .with_context(|| format!("Failed to compute {}", index))?;
        let path = export::write_taxon_index(&result, out_dir)?;
        println!("  {:<4} {:>5} taxa  -> {}", index.short_name(), result.len(), path.display());
    }

    let fl = table.fidelity_level().context("Failed to compute FL")?;
    let path = export::write_fidelity_level(&fl, out_dir)?;
    println!("  {:<4} {:>5} pairs -> {}", "FL", fl.len(), path.display());

    let fic = table.informant_consensus_factor().context("Failed to compute FIC")?;
    let path = export::write_consensus_factor(&fic, out_dir)?;
    println!("  {:<4} {:>5} uses  -> {}", "FIC", fic.len(), path.display());

    let composed = table
        .all_taxon_indices(Some(SortSpec::descending(TaxonIndex::Ci)))
        .context("Failed to compose taxon indices")?;
    let path = export::write_composed(&composed, out_dir)?;
    println!("\nAll taxon indices ({} taxa) -> {}", composed.len(), path.display());

    let options = SimilarityOptions {
        my_study_label: config.my_study_label.clone(),
        delimiter: config.literature_delimiter,
    };
    let similarity = table.jaccard(&options).context("Failed to compute Jaccard similarity")?;
    let path = export::write_similarity(&similarity, out_dir)?;

    println!("\nJaccard similarity vs '{}':", options.my_study_label);
    for row in &similarity.rows {
        println!("  {:<40} {:.4}", row.study, row.similarity);
    }
    println!("  -> {}", path.display());

    println!("\nTotal time: {:.1} ms", total_start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}
