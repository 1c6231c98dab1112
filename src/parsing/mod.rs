//! Parsers for the inputs of a run.
//!
//! This module provides parsers for:
//!
//! - **Contig sizes files**: `id<TAB>length`, one contig per line
//! - **Study metadata**: JSON describing the study and the column names of a sumstats file
//! - **Summary statistics files**: whitespace-delimited text with a header line
//! - **VCF files**: the minimal record shape written by this crate, for liftover
//!
//! Any input path ending in `.gz` is decompressed transparently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sumstats_vcf::parsing::metadata::Metadata;
//! use sumstats_vcf::parsing::sizes::parse_sizes_file;
//! use std::path::Path;
//!
//! let metadata = Metadata::from_file(Path::new("study.json")).unwrap();
//! let registry = parse_sizes_file(Path::new("hg38.chrom.sizes"), &metadata.study.genome_build).unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod metadata;
pub mod sizes;
pub mod sumstats;
pub mod vcf;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many contigs: {0} exceeds maximum allowed (100000)")]
    TooManyContigs(usize),
}

/// Open a text input, decompressing it when the path ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead + Send>, ParseError> {
    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
