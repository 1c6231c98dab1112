//! Run orchestration.
//!
//! - [`batch`]: the batched parallel line processor shared by every run
//! - [`convert`]: summary statistics to VCF, with optional liftover
//! - [`lift`]: VCF to VCF liftover
//!
//! Both runs stage their output files and commit them only after the last batch,
//! so a fatal error never leaves a partial VCF behind.

pub mod batch;
pub mod convert;
pub mod lift;

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::core::contig::ContigRegistry;
use crate::core::variant::Variant;
use crate::error::Result;
use crate::liftover::LiftOutcome;
use crate::output::staged::StagedFile;
use crate::output::vcf::{format_record, HeaderMeta, VcfWriter};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    /// Non-blank data lines read
    pub records_read: u64,
    /// Records written to the primary output
    pub records_written: u64,
    /// Variants with no liftover target
    pub unmapped: u64,
}

/// Where unmapped variants go: a VCF in source coordinates, or the log
pub(crate) enum UnmappedChannel {
    File(VcfWriter<StagedFile>),
    Log,
}

impl UnmappedChannel {
    /// Open the channel. With a path, the file carries `meta` and `source` contigs
    /// as its header.
    pub(crate) fn open(
        path: Option<&PathBuf>,
        meta: &HeaderMeta,
        source: &ContigRegistry,
    ) -> Result<Self> {
        match path {
            Some(path) => {
                let mut writer = VcfWriter::new(StagedFile::create(path)?);
                writer.write_header(meta, source)?;
                Ok(Self::File(writer))
            }
            None => Ok(Self::Log),
        }
    }

    pub(crate) fn send(&mut self, variant: &Variant) -> Result<()> {
        match self {
            Self::File(writer) => writer.write_record(variant)?,
            Self::Log => warn!(record = %format_record(variant), "variant did not lift over"),
        }
        Ok(())
    }

    pub(crate) fn commit(self) -> Result<()> {
        if let Self::File(writer) = self {
            writer.finish()?.commit()?;
        }
        Ok(())
    }
}

/// Flush both outputs, then rename the unmapped file before the primary one.
///
/// The primary output only appears once everything else has succeeded.
pub(crate) fn commit_outputs(output: VcfWriter<StagedFile>, unmapped: UnmappedChannel) -> Result<()> {
    let output = output.finish()?;
    unmapped.commit()?;
    output.commit()?;
    Ok(())
}

/// Sink shared by both runs: mapped variants go to `output`, unmapped to `unmapped`
pub(crate) fn route(
    outcome: LiftOutcome,
    output: &mut VcfWriter<StagedFile>,
    unmapped: &mut UnmappedChannel,
    summary: &mut RunSummary,
) -> Result<()> {
    match outcome {
        LiftOutcome::Mapped(variant) => {
            output.write_record(&variant)?;
            summary.records_written += 1;
        }
        LiftOutcome::Unmapped(variant) => {
            unmapped.send(&variant)?;
            summary.unmapped += 1;
        }
    }
    Ok(())
}
