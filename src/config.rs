//! Column roles and analysis configuration
//!
//! Every calculator receives the same `ColumnRoles` value instead of its own
//! copy of the informant/taxon/use column names.

use crate::error::{EthnoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INFORMANT_COLUMN: &str = "informant";
pub const DEFAULT_TAXON_COLUMN: &str = "taxon";
pub const DEFAULT_USE_COLUMN: &str = "ailments_treated";
pub const DEFAULT_LITERATURE_COLUMN: &str = "literature";

/// Reserved label for the current dataset in the similarity pipeline
pub const DEFAULT_MY_STUDY_LABEL: &str = "My Study";
pub const DEFAULT_LITERATURE_DELIMITER: char = ';';

/// Names of the columns playing each role in an observation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub informant: String,
    pub taxon: String,
    /// Use label / ailment category
    #[serde(rename = "use")]
    pub use_label: String,
    /// Delimiter-separated literature references (similarity pipeline only)
    pub literature: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            informant: DEFAULT_INFORMANT_COLUMN.to_string(),
            taxon: DEFAULT_TAXON_COLUMN.to_string(),
            use_label: DEFAULT_USE_COLUMN.to_string(),
            literature: DEFAULT_LITERATURE_COLUMN.to_string(),
        }
    }
}

impl ColumnRoles {
    pub fn with_informant(mut self, name: impl Into<String>) -> Self {
        self.informant = name.into();
        self
    }

    pub fn with_taxon(mut self, name: impl Into<String>) -> Self {
        self.taxon = name.into();
        self
    }

    pub fn with_use(mut self, name: impl Into<String>) -> Self {
        self.use_label = name.into();
        self
    }

    pub fn with_literature(mut self, name: impl Into<String>) -> Self {
        self.literature = name.into();
        self
    }

    /// Columns every index calculation needs
    pub fn required(&self) -> [&str; 3] {
        [&self.informant, &self.taxon, &self.use_label]
    }
}

/// Full configuration for a batch analysis run (used by the CLI)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub roles: ColumnRoles,
    pub my_study_label: String,
    pub literature_delimiter: char,
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roles: ColumnRoles::default(),
            my_study_label: DEFAULT_MY_STUDY_LABEL.to_string(),
            literature_delimiter: DEFAULT_LITERATURE_DELIMITER,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file; absent keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let roles = &self.roles;
        let names = [&roles.informant, &roles.taxon, &roles.use_label];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(EthnoError::Config(
                "informant, taxon and use column names must be non-empty".to_string(),
            ));
        }
        if roles.informant == roles.taxon
            || roles.informant == roles.use_label
            || roles.taxon == roles.use_label
        {
            return Err(EthnoError::Config(format!(
                "column roles must be distinct (informant='{}', taxon='{}', use='{}')",
                roles.informant, roles.taxon, roles.use_label
            )));
        }
        if self.my_study_label.is_empty() {
            return Err(EthnoError::Config("my_study_label must be non-empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "roles": { "taxon": "sp_name" } }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.roles.taxon, "sp_name");
        assert_eq!(config.roles.informant, "informant");
        assert_eq!(config.roles.use_label, "ailments_treated");
        assert_eq!(config.my_study_label, "My Study");
        assert_eq!(config.literature_delimiter, ';');
    }

    #[test]
    fn test_duplicate_roles_rejected() {
        let config = AnalysisConfig {
            roles: ColumnRoles::default().with_taxon("informant"),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EthnoError::Config(_))));
    }

    #[test]
    fn test_builder_setters() {
        let roles = ColumnRoles::default()
            .with_informant("id")
            .with_taxon("sp_name")
            .with_use("use_category")
            .with_literature("refs");

        assert_eq!(roles.required(), ["id", "sp_name", "use_category"]);
        assert_eq!(roles.literature, "refs");
    }
}
