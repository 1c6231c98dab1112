use thiserror::Error;

use crate::parsing::ParseError;

/// Fatal conditions for a conversion or liftover run.
///
/// An unmapped variant is not an error; see [`crate::liftover::LiftOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("duplicate contig '{id}' in contig sizes")]
    DuplicateContig { id: String },

    #[error("malformed record on line {line}: {field} value '{value}' {reason}")]
    MalformedRecord {
        line: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown contig '{chrom}' on line {line}")]
    UnknownContig { line: usize, chrom: String },

    #[error("liftover of {contig}:{position} maps to contig '{target}' which is not in the target assembly")]
    LookupInconsistency {
        contig: String,
        position: u64,
        target: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(
        line: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            line,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
