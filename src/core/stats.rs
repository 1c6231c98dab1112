//! Summary statistics and the derivation lattice that completes them.
//!
//! Derivations only run forward:
//!
//! ```text
//! (beta, stderr) --> zscore --> pvalue --> logp
//! ```
//!
//! A value present on input is never recomputed, and nothing is inferred backwards
//! (beta is never reconstructed from a z-score).

use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;

/// Per-variant association statistics. `None` means not measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub beta: Option<f64>,
    pub stderr: Option<f64>,
    pub zscore: Option<f64>,
    pub pvalue: Option<f64>,
    pub logp: Option<f64>,
}

impl SummaryStats {
    /// Fill every field derivable from the ones present.
    #[must_use]
    pub fn complete(self) -> Self {
        let zscore = self.zscore.or_else(|| match (self.beta, self.stderr) {
            (Some(beta), Some(stderr)) => Some(zscore(beta, stderr)),
            _ => None,
        });
        let pvalue = self.pvalue.or_else(|| zscore.map(pvalue));
        let logp = self.logp.or_else(|| pvalue.map(logp));

        Self {
            beta: self.beta,
            stderr: self.stderr,
            zscore,
            pvalue,
            logp,
        }
    }
}

/// `beta / stderr`; a zero standard error gives an infinity carrying the sign of beta.
#[must_use]
pub fn zscore(beta: f64, stderr: f64) -> f64 {
    if stderr == 0.0 {
        f64::INFINITY.copysign(beta)
    } else {
        beta / stderr
    }
}

/// Standard normal CDF expressed through the error function
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Two-tailed p-value of a z-score
#[must_use]
pub fn pvalue(zscore: f64) -> f64 {
    2.0 * (1.0 - normal_cdf(zscore.abs()))
}

/// `-log10(p)`, with `p == 0` mapping to positive infinity
#[must_use]
pub fn logp(pvalue: f64) -> f64 {
    if pvalue == 0.0 {
        f64::INFINITY
    } else {
        -pvalue.log10()
    }
}
