//! Building variants from tokenized summary statistics lines.

use std::sync::Arc;

use crate::core::chrom::ChromConvert;
use crate::core::columns::{ColumnKey, Field};
use crate::core::contig::{Contig, ContigRegistry};
use crate::core::stats::SummaryStats;
use crate::core::variant::Variant;
use crate::error::{Error, Result};

/// Token used for a missing value inside a present column
pub const MISSING: &str = ".";

/// Turns one tokenized line into a [`Variant`].
///
/// Holds only shared read-only state, so one builder serves every worker of a run.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    key: &'a ColumnKey,
    registry: &'a ContigRegistry,
    convert: ChromConvert,
}

impl<'a> RecordBuilder<'a> {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the chromosome or position column did not
    /// resolve, since no record could be placed without them.
    pub fn new(key: &'a ColumnKey, registry: &'a ContigRegistry, convert: ChromConvert) -> Result<Self> {
        for field in [Field::Chrom, Field::Pos] {
            if !key.is_present(field) {
                return Err(Error::Configuration(format!(
                    "column for '{}' is not declared or not found in the input header",
                    field.key()
                )));
            }
        }
        Ok(Self {
            key,
            registry,
            convert,
        })
    }

    /// Build the variant for `tokens`, read from 1-based input line `line`.
    ///
    /// # Errors
    ///
    /// `Error::MalformedRecord` for a missing token or an unparseable position or
    /// statistic, `Error::UnknownContig` if the normalized chromosome is not in the
    /// registry.
    pub fn build<S: AsRef<str>>(&self, tokens: &[S], line: usize) -> Result<Variant> {
        let chrom = self
            .text(tokens, Field::Chrom, line)?
            .ok_or_else(|| Error::malformed(line, Field::Chrom.key(), MISSING, "is missing"))?;
        let contig = self.contig(chrom, line)?;
        let position = self.position(tokens, line)?;

        let info = SummaryStats {
            beta: self.number(tokens, Field::Beta, line)?,
            stderr: self.number(tokens, Field::BetaSe, line)?,
            zscore: self.number(tokens, Field::Zscore, line)?,
            pvalue: self.number(tokens, Field::Pval, line)?,
            logp: self.number(tokens, Field::Logp, line)?,
        }
        .complete();

        Ok(Variant {
            contig,
            position,
            name: self.text(tokens, Field::Id, line)?.map(str::to_string),
            reference_allele: self.text(tokens, Field::OtherAllele, line)?.map(str::to_string),
            alternate_allele: self.text(tokens, Field::EffAllele, line)?.map(str::to_string),
            filter: None,
            quality: None,
            info,
        })
    }

    fn contig(&self, chrom: &str, line: usize) -> Result<Arc<Contig>> {
        self.registry
            .resolve(chrom, self.convert)
            .cloned()
            .ok_or_else(|| Error::UnknownContig {
                line,
                chrom: self.convert.apply(chrom).into_owned(),
            })
    }

    fn position<S: AsRef<str>>(&self, tokens: &[S], line: usize) -> Result<u64> {
        let raw = self
            .text(tokens, Field::Pos, line)?
            .ok_or_else(|| Error::malformed(line, Field::Pos.key(), MISSING, "is missing"))?;
        match raw.parse::<u64>() {
            Ok(0) => Err(Error::malformed(line, Field::Pos.key(), raw, "is not 1-based")),
            Ok(pos) => Ok(pos),
            Err(e) => Err(Error::malformed(line, Field::Pos.key(), raw, e.to_string())),
        }
    }

    /// Token for `field`; `None` when the column is absent or holds the missing token.
    fn text<'t, S: AsRef<str>>(
        &self,
        tokens: &'t [S],
        field: Field,
        line: usize,
    ) -> Result<Option<&'t str>> {
        let Some(idx) = self.key.get(field) else {
            return Ok(None);
        };
        let token = tokens.get(idx).map(|t| t.as_ref()).ok_or_else(|| {
            Error::malformed(
                line,
                field.key(),
                "",
                format!("not present: line has {} fields, column is {}", tokens.len(), idx + 1),
            )
        })?;
        Ok((token != MISSING).then_some(token))
    }

    fn number<S: AsRef<str>>(&self, tokens: &[S], field: Field, line: usize) -> Result<Option<f64>> {
        self.text(tokens, field, line)?
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|e| Error::malformed(line, field.key(), raw, e.to_string()))
            })
            .transpose()
    }
}
