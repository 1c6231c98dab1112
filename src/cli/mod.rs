//! Command-line interface for sumstats-vcf.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **convert**: Convert a GWAS summary statistics file to VCF, optionally lifting it over
//! - **liftover**: Lift a VCF written by `convert` onto another assembly
//!
//! ## Usage
//!
//! ```text
//! # Convert, renaming chromosomes to UCSC style
//! sumstats-vcf convert height.txt.gz height.json --chrom-sizes hg19.chrom.sizes \
//!     --chrom-convert ucsc -o height.hg19.vcf
//!
//! # Convert and lift to hg38 in one pass
//! sumstats-vcf convert height.txt.gz height.json --chrom-sizes hg19.chrom.sizes \
//!     --chain hg19ToHg38.over.chain.gz --target-chrom-sizes hg38.chrom.sizes \
//!     --target-build hg38 -u unmapped.vcf -o height.hg38.vcf
//!
//! # Lift an existing VCF, JSON run summary for scripting
//! sumstats-vcf --format json liftover height.hg19.vcf hg19ToHg38.over.chain.gz \
//!     hg38.chrom.sizes -g hg38 -o height.hg38.vcf
//! ```

use std::io::Write;

use clap::{Parser, Subcommand};

use crate::pipeline::RunSummary;

pub mod convert;
pub mod liftover;

#[derive(Parser)]
#[command(name = "sumstats-vcf")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert GWAS summary statistics to VCF and lift them between assemblies")]
#[command(
    long_about = "sumstats-vcf converts whitespace-delimited GWAS summary statistics into VCF.\n\nColumns are located through a study metadata file, missing statistics are derived (BETA/SE -> Z -> P -> LOGP), chromosome names are normalized against a contig sizes file, and records can be lifted to another assembly with a UCSC chain file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of the run summary
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert summary statistics to VCF
    Convert(convert::ConvertArgs),

    /// Lift a VCF onto another assembly
    Liftover(liftover::LiftoverArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print the run summary to stdout
pub(crate) fn print_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Text => {
            writeln!(out, "Output: {}", summary.output.display())?;
            writeln!(out, "  Records read:    {}", summary.records_read)?;
            writeln!(out, "  Records written: {}", summary.records_written)?;
            writeln!(out, "  Unmapped:        {}", summary.unmapped)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
