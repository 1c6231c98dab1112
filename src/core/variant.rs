use std::sync::Arc;

use crate::core::contig::Contig;
use crate::core::stats::SummaryStats;

/// INFO keys in their fixed output order
pub const INFO_KEYS: [&str; 5] = ["BETA", "SE", "Z", "P", "LOGP"];

/// A single biallelic variant with its association statistics.
///
/// Values are immutable; liftover produces a new variant through [`Variant::relocated`].
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub contig: Arc<Contig>,
    /// 1-based position
    pub position: u64,
    pub name: Option<String>,
    pub reference_allele: Option<String>,
    pub alternate_allele: Option<String>,
    pub filter: Option<String>,
    pub quality: Option<String>,
    pub info: SummaryStats,
}

impl Variant {
    /// Same variant at a new contig/position, all other fields unchanged
    #[must_use]
    pub fn relocated(&self, contig: Arc<Contig>, position: u64) -> Self {
        Self {
            contig,
            position,
            ..self.clone()
        }
    }

    /// INFO values paired with their keys, in output order
    pub fn info_entries(&self) -> [(&'static str, Option<f64>); 5] {
        let SummaryStats {
            beta,
            stderr,
            zscore,
            pvalue,
            logp,
        } = self.info;
        [
            (INFO_KEYS[0], beta),
            (INFO_KEYS[1], stderr),
            (INFO_KEYS[2], zscore),
            (INFO_KEYS[3], pvalue),
            (INFO_KEYS[4], logp),
        ]
    }
}
