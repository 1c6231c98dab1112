//! # sumstats-vcf
//!
//! A library for converting GWAS summary statistics into VCF.
//!
//! Summary statistics arrive as whitespace-delimited text with study-specific column
//! names and an inconsistent mix of effect sizes, standard errors, z-scores and
//! p-values. `sumstats-vcf` locates each semantic column through a study metadata
//! file, fills in whatever statistics can be derived, validates chromosomes against
//! the contigs of the study's genome build, and writes a standard VCF.
//!
//! ## Features
//!
//! - **Column resolution**: declared column names are matched against the input header once per file
//! - **Statistics completion**: BETA/SE → Z → P → LOGP, never overwriting given values
//! - **Chromosome naming**: `chr`-prefixed (UCSC) or bare names, normalized before contig lookup
//! - **Liftover**: relocation onto another assembly through a UCSC chain file
//! - **Parallel, ordered processing**: batches are transformed on a sized worker pool and written in input order
//! - **No partial output**: files appear only when a run completes
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use sumstats_vcf::core::chrom::ChromConvert;
//! use sumstats_vcf::pipeline::batch::PipelineConfig;
//! use sumstats_vcf::pipeline::convert::{convert_sumstats, ConversionConfig};
//!
//! let config = ConversionConfig {
//!     sumstats: PathBuf::from("height.txt.gz"),
//!     metadata: PathBuf::from("height.json"),
//!     chrom_sizes: PathBuf::from("hg19.chrom.sizes"),
//!     output: PathBuf::from("height.vcf"),
//!     chrom_convert: ChromConvert::Ucsc,
//!     pipeline: PipelineConfig::default(),
//!     liftover: None,
//! };
//!
//! let summary = convert_sumstats(&config).unwrap();
//! println!("{} records written", summary.records_written);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for contigs, columns, statistics and variants
//! - [`parsing`]: Parsers for sizes files, study metadata, summary statistics and VCF
//! - [`liftover`]: Chain lookups and variant relocation
//! - [`pipeline`]: Batched parallel processing and run orchestration
//! - [`output`]: VCF serialization and staged output files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod error;
pub mod liftover;
pub mod output;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::contig::{Contig, ContigRegistry};
pub use core::stats::SummaryStats;
pub use core::variant::Variant;
pub use error::{Error, Result};
pub use liftover::{ChainLookup, LiftOutcome};
pub use pipeline::RunSummary;
