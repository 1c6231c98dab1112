use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_summary, OutputFormat};
use crate::parsing::vcf::UNKNOWN_ASSEMBLY;
use crate::pipeline::batch::PipelineConfig;
use crate::pipeline::lift::{liftover_vcf, LiftoverConfig};
use crate::utils::validation::DEFAULT_BATCH_SIZE;

#[derive(Args)]
pub struct LiftoverArgs {
    /// VCF written by `convert` (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// UCSC chain file from the input's assembly to the target
    #[arg(required = true)]
    pub chain: PathBuf,

    /// Contig sizes of the target assembly
    #[arg(required = true)]
    pub target_chrom_sizes: PathBuf,

    /// Output VCF
    #[arg(short, long)]
    pub output: PathBuf,

    /// VCF receiving variants that do not lift over (default: log them)
    #[arg(short, long)]
    pub unmapped: Option<PathBuf>,

    /// Name of the target assembly
    #[arg(short = 'g', long, default_value = UNKNOWN_ASSEMBLY)]
    pub genome_build: String,

    /// Lines per processing batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Worker threads (default: one per CPU)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

pub fn run(args: LiftoverArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = LiftoverConfig {
        input: args.input,
        chain: args.chain,
        target_chrom_sizes: args.target_chrom_sizes,
        output: args.output,
        unmapped: args.unmapped,
        genome_build: args.genome_build,
        pipeline: PipelineConfig {
            batch_size: args.batch_size,
            threads: args.threads,
        },
    };

    if verbose {
        eprintln!(
            "Lifting {} to {} with {}",
            config.input.display(),
            config.genome_build,
            config.chain.display()
        );
    }

    let summary = liftover_vcf(&config)
        .with_context(|| format!("Failed to lift over {}", config.input.display()))?;

    print_summary(&summary, format)
}
