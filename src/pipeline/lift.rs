//! Liftover of a VCF written by [`crate::pipeline::convert`] onto another assembly.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::liftover::chain::ChainFile;
use crate::liftover::lift_variant;
use crate::output::staged::StagedFile;
use crate::output::vcf::{HeaderMeta, VcfWriter};
use crate::parsing::open_input;
use crate::parsing::sizes::parse_sizes_file;
use crate::parsing::vcf::{parse_record, read_header, UNKNOWN_ASSEMBLY};
use crate::pipeline::batch::{BatchPipeline, PipelineConfig};
use crate::pipeline::{commit_outputs, route, RunSummary, UnmappedChannel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftoverConfig {
    pub input: PathBuf,
    pub chain: PathBuf,
    pub target_chrom_sizes: PathBuf,
    pub output: PathBuf,
    pub unmapped: Option<PathBuf>,
    /// Assembly label of the target contigs
    pub genome_build: String,
    pub pipeline: PipelineConfig,
}

impl LiftoverConfig {
    pub fn new(input: PathBuf, chain: PathBuf, target_chrom_sizes: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            chain,
            target_chrom_sizes,
            output,
            unmapped: None,
            genome_build: UNKNOWN_ASSEMBLY.to_string(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Lift every record of `config.input` onto the target assembly.
///
/// The output header lists the target contigs and keeps the input's DOI and
/// phenotype. Unmapped records keep their source coordinates.
///
/// # Errors
///
/// Fails without writing any output on a malformed header or record, a record on a
/// contig missing from the input header, or a chain hit on a contig missing from
/// the target sizes file.
pub fn liftover_vcf(config: &LiftoverConfig) -> Result<RunSummary> {
    let pipeline = BatchPipeline::new(config.pipeline)?;
    info!(
        input = %config.input.display(),
        chain = %config.chain.display(),
        build = %config.genome_build,
        batch_size = pipeline.batch_size(),
        threads = pipeline.threads(),
        "lifting over VCF"
    );

    let mut reader = open_input(&config.input)?;
    let header = read_header(&mut reader)?;
    let source = &header.contigs;
    let chains = ChainFile::from_file(&config.chain)?;
    let target = parse_sizes_file(&config.target_chrom_sizes, &config.genome_build)?;

    let source_meta = HeaderMeta::new(
        header
            .reference
            .clone()
            .unwrap_or_else(|| UNKNOWN_ASSEMBLY.to_string()),
        header.doi.clone(),
        header.phenotype.clone(),
    );
    let target_meta = HeaderMeta {
        reference: config.genome_build.clone(),
        ..source_meta.clone()
    };

    let mut output = VcfWriter::new(StagedFile::create(&config.output)?);
    output.write_header(&target_meta, &target)?;
    let mut unmapped = UnmappedChannel::open(config.unmapped.as_ref(), &source_meta, source)?;

    let mut summary = RunSummary {
        output: config.output.clone(),
        ..RunSummary::default()
    };
    let stats = pipeline.run(
        &mut reader,
        header.lines_consumed,
        |line, line_num| {
            let variant = parse_record(line, source, line_num)?;
            lift_variant(&variant, &chains, &target)
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
        "liftover complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    const INPUT: &str = "##fileformat=VCFv4.2
##fileDate=2024-01-01
##source=sumstats-vcf
##reference=hg19
##doi=10.1000/xyz
##phenotype=height
##contig=<ID=chr1,length=1000,assembly=hg19>
##FILTER=<ID=.,Description=\"Not Provided\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr1\t100\trs1\tG\tA\t.\t.\tBETA=0.1;SE=0.05;Z=2.0;P=0.05;LOGP=1.25
chr1\t900\trs2\tC\tT\t.\t.\tBETA=.;SE=.;Z=.;P=.;LOGP=.
";

    fn setup(dir: &std::path::Path, target_sizes: &str) -> LiftoverConfig {
        fs::write(dir.join("in.vcf"), INPUT).unwrap();
        fs::write(
            dir.join("lift.chain"),
            "chain 500 chr1 1000 + 0 500 chr1 3000 + 1000 1500 1\n500\n",
        )
        .unwrap();
        fs::write(dir.join("target.sizes"), target_sizes).unwrap();
        let mut config = LiftoverConfig::new(
            dir.join("in.vcf"),
            dir.join("lift.chain"),
            dir.join("target.sizes"),
            dir.join("out.vcf"),
        );
        config.genome_build = "hg38".to_string();
        config
    }

    #[test]
    fn test_liftover_vcf() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), "chr1\t3000\n");

        let summary = liftover_vcf(&config).unwrap();
        assert_eq!(summary.records_read, 2);
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.unmapped, 1);

        let text = fs::read_to_string(&config.output).unwrap();
        assert!(text.contains("##reference=hg38\n##doi=10.1000/xyz\n##phenotype=height\n"));
        assert!(text.contains("##contig=<ID=chr1,length=3000,assembly=hg38>\n"));
        assert!(text.ends_with(
            "chr1\t1100\trs1\tG\tA\t.\t.\tBETA=0.1;SE=0.05;Z=2.0;P=0.05;LOGP=1.25\n"
        ));
    }

    #[test]
    fn test_target_contig_missing_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), "chr2\t3000\n");

        assert!(matches!(
            liftover_vcf(&config),
            Err(Error::LookupInconsistency { .. })
        ));
        assert!(!config.output.exists());
    }
}
