//! Study metadata describing a summary statistics file.
//!
//! ```json
//! {
//!   "study": {
//!     "doi": "10.1038/s41586-020-0000-0",
//!     "genome_build": "GRCh38",
//!     "phenotype": "height",
//!     "columns": {
//!       "chrom": "CHR", "pos": "POS", "id": "SNP",
//!       "eff_allele": "A1", "other_allele": "A2",
//!       "beta": "BETA", "beta_se": "SE",
//!       "zscore": null, "pval": null, "logp": null
//!     }
//!   }
//! }
//! ```
//!
//! Every column key except `beta_se` must be present; any of them may be `null`.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::columns::Field;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub study: Study,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub doi: String,
    pub genome_build: String,
    pub phenotype: String,
    pub columns: ColumnMapping,
}

/// Declared input column name for each semantic field; `None` when not provided
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(deserialize_with = "required_nullable")]
    pub chrom: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub pos: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub id: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub eff_allele: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub other_allele: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub beta: Option<String>,
    #[serde(default)]
    pub beta_se: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub zscore: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub pval: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub logp: Option<String>,
}

// With `deserialize_with` and no `default`, serde reports a missing key as an
// error instead of silently filling `None`.
fn required_nullable<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl ColumnMapping {
    pub fn declared(&self, field: Field) -> Option<&str> {
        let name = match field {
            Field::Chrom => &self.chrom,
            Field::Pos => &self.pos,
            Field::Id => &self.id,
            Field::EffAllele => &self.eff_allele,
            Field::OtherAllele => &self.other_allele,
            Field::Beta => &self.beta,
            Field::BetaSe => &self.beta_se,
            Field::Zscore => &self.zscore,
            Field::Pval => &self.pval,
            Field::Logp => &self.logp,
        };
        name.as_deref()
    }
}

impl Metadata {
    /// Load metadata from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Configuration` if
    /// it is not valid metadata JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            Error::Configuration(msg) => {
                Error::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse metadata from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` on malformed JSON, a missing required key, or a
    /// value of the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid study metadata: {e}")))
    }
}
