use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_summary, OutputFormat};
use crate::core::chrom::ChromConvert;
use crate::pipeline::batch::PipelineConfig;
use crate::pipeline::convert::{convert_sumstats, liftover_target, ConversionConfig};
use crate::utils::validation::DEFAULT_BATCH_SIZE;

#[derive(Args)]
pub struct ConvertArgs {
    /// Summary statistics file (whitespace-delimited, optionally gzipped)
    #[arg(required = true)]
    pub sumstats: PathBuf,

    /// Study metadata JSON naming the input columns
    #[arg(required = true)]
    pub metadata: PathBuf,

    /// Contig sizes of the study's genome build (`id<TAB>length`)
    #[arg(long)]
    pub chrom_sizes: PathBuf,

    /// Output VCF
    #[arg(short, long)]
    pub output: PathBuf,

    /// Chromosome naming applied to input names before contig lookup
    #[arg(long, value_enum, default_value_t = ChromConvert::None)]
    pub chrom_convert: ChromConvert,

    /// Lines per processing batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Worker threads (default: one per CPU)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// UCSC chain file to lift records to another assembly
    #[arg(long, requires = "target_chrom_sizes")]
    pub chain: Option<PathBuf>,

    /// Contig sizes of the target assembly
    #[arg(long, requires = "chain")]
    pub target_chrom_sizes: Option<PathBuf>,

    /// Name of the target assembly
    #[arg(long, requires = "chain")]
    pub target_build: Option<String>,

    /// VCF receiving variants that do not lift over (default: log them)
    #[arg(short, long, requires = "chain")]
    pub unmapped: Option<PathBuf>,
}

pub fn run(args: ConvertArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let liftover = liftover_target(
        args.chain,
        args.target_chrom_sizes,
        args.target_build,
        args.unmapped,
    )?;

    let config = ConversionConfig {
        sumstats: args.sumstats,
        metadata: args.metadata,
        chrom_sizes: args.chrom_sizes,
        output: args.output,
        chrom_convert: args.chrom_convert,
        pipeline: PipelineConfig {
            batch_size: args.batch_size,
            threads: args.threads,
        },
        liftover,
    };

    if verbose {
        eprintln!("Converting {}", config.sumstats.display());
    }

    let summary = convert_sumstats(&config)
        .with_context(|| format!("Failed to convert {}", config.sumstats.display()))?;

    print_summary(&summary, format)
}
