//! Writers for run output.
//!
//! - [`vcf`]: VCF header and record formatting
//! - [`staged`]: files committed only when a run succeeds

pub mod staged;
pub mod vcf;
