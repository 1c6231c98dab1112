//! Summary statistics to VCF conversion.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::chrom::ChromConvert;
use crate::core::columns::ColumnKey;
use crate::core::contig::ContigRegistry;
use crate::core::record::RecordBuilder;
use crate::error::{Error, Result};
use crate::liftover::chain::ChainFile;
use crate::liftover::{lift_variant, LiftOutcome};
use crate::output::staged::StagedFile;
use crate::output::vcf::{HeaderMeta, VcfWriter};
use crate::parsing::metadata::Metadata;
use crate::parsing::open_input;
use crate::parsing::sizes::parse_sizes_file;
use crate::parsing::sumstats::{read_header, tokenize};
use crate::parsing::vcf::UNKNOWN_ASSEMBLY;
use crate::pipeline::batch::{BatchPipeline, PipelineConfig};
use crate::pipeline::{commit_outputs, route, RunSummary, UnmappedChannel};

/// Liftover settings for a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftoverTarget {
    pub chain: PathBuf,
    pub target_chrom_sizes: PathBuf,
    /// Assembly label of the target contigs; `UNKNOWN` when not given
    pub target_build: Option<String>,
    /// VCF receiving unmapped variants; logged when not given
    pub unmapped: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub sumstats: PathBuf,
    pub metadata: PathBuf,
    pub chrom_sizes: PathBuf,
    pub output: PathBuf,
    pub chrom_convert: ChromConvert,
    pub pipeline: PipelineConfig,
    pub liftover: Option<LiftoverTarget>,
}

struct LiftContext {
    chains: ChainFile,
    target: ContigRegistry,
    unmapped: Option<PathBuf>,
}

/// Convert a summary statistics file to VCF.
///
/// Records are written in input order. With a liftover target, records are
/// relocated onto the target assembly and the header lists the target contigs;
/// unmapped variants go to the unmapped file or the log.
///
/// # Errors
///
/// Any fatal condition aborts the run and leaves no output file: bad metadata or
/// missing coordinate columns (`Configuration`), duplicate contigs, a malformed or
/// unplaceable line, or a chain hit on a contig missing from the target sizes.
pub fn convert_sumstats(config: &ConversionConfig) -> Result<RunSummary> {
    let pipeline = BatchPipeline::new(config.pipeline)?;
    let metadata = Metadata::from_file(&config.metadata)?;
    let study = &metadata.study;

    info!(
        sumstats = %config.sumstats.display(),
        build = %study.genome_build,
        chrom_convert = %config.chrom_convert,
        liftover = config.liftover.is_some(),
        batch_size = pipeline.batch_size(),
        threads = pipeline.threads(),
        "converting summary statistics"
    );

    let registry = parse_sizes_file(&config.chrom_sizes, &study.genome_build)?;
    let lift = config
        .liftover
        .as_ref()
        .map(|target| -> Result<LiftContext> {
            let build = target.target_build.as_deref().unwrap_or(UNKNOWN_ASSEMBLY);
            Ok(LiftContext {
                chains: ChainFile::from_file(&target.chain)?,
                target: parse_sizes_file(&target.target_chrom_sizes, build)?,
                unmapped: target.unmapped.clone(),
            })
        })
        .transpose()?;

    let mut reader = open_input(&config.sumstats)?;
    let header = read_header(&mut reader)?;
    let key = ColumnKey::resolve(&study.columns, &header.columns);
    log_columns(&metadata, &key);
    let builder = RecordBuilder::new(&key, &registry, config.chrom_convert)?;

    let source_meta = HeaderMeta::new(
        study.genome_build.clone(),
        Some(study.doi.clone()),
        Some(study.phenotype.clone()),
    );
    let (output_meta, output_contigs) = match &lift {
        Some(ctx) => (
            HeaderMeta {
                reference: ctx.target.assembly().to_string(),
                ..source_meta.clone()
            },
            &ctx.target,
        ),
        None => (source_meta.clone(), &registry),
    };

    let mut output = VcfWriter::new(StagedFile::create(&config.output)?);
    output.write_header(&output_meta, output_contigs)?;
    let mut unmapped = UnmappedChannel::open(
        lift.as_ref().and_then(|ctx| ctx.unmapped.as_ref()),
        &source_meta,
        &registry,
    )?;

    let mut summary = RunSummary {
        output: config.output.clone(),
        ..RunSummary::default()
    };
    let stats = pipeline.run(
        &mut reader,
        header.lines_consumed,
        |line, line_num| {
            let variant = builder.build(&tokenize(line), line_num)?;
            match &lift {
                Some(ctx) => lift_variant(&variant, &ctx.chains, &ctx.target),
                None => Ok(LiftOutcome::Mapped(variant)),
            }
        },
        |outcome| route(outcome, &mut output, &mut unmapped, &mut summary),
    )?;
    summary.records_read = stats.lines;

    commit_outputs(output, unmapped)?;

    info!(
        records_read = summary.records_read,
        records_written = summary.records_written,
        unmapped = summary.unmapped,
        output = %config.output.display(),
        "conversion complete"
    );
    Ok(summary)
}

fn log_columns(metadata: &Metadata, key: &ColumnKey) {
    for (field, position) in key.iter() {
        let declared = metadata.study.columns.declared(field);
        match (declared, position) {
            (Some(name), Some(index)) => debug!(field = field.key(), column = name, index, "resolved column"),
            (Some(name), None) => warn!(field = field.key(), column = name, "declared column not found in header"),
            (None, _) => debug!(field = field.key(), "column not provided"),
        }
    }
}

/// Check that liftover options were given together.
///
/// # Errors
///
/// Returns `Error::Configuration` when only one of the chain and the target sizes
/// file is present.
pub fn liftover_target(
    chain: Option<PathBuf>,
    target_chrom_sizes: Option<PathBuf>,
    target_build: Option<String>,
    unmapped: Option<PathBuf>,
) -> Result<Option<LiftoverTarget>> {
    match (chain, target_chrom_sizes) {
        (Some(chain), Some(target_chrom_sizes)) => Ok(Some(LiftoverTarget {
            chain,
            target_chrom_sizes,
            target_build,
            unmapped,
        })),
        (None, None) => {
            if unmapped.is_some() || target_build.is_some() {
                return Err(Error::Configuration(
                    "--unmapped and --target-build require --chain".to_string(),
                ));
            }
            Ok(None)
        }
        _ => Err(Error::Configuration(
            "--chain and --target-chrom-sizes must be given together".to_string(),
        )),
    }
}
