//! Parser for contig sizes files (UCSC `chrom.sizes` style).
//!
//! Format: one contig per line, `id<whitespace>length`. Extra columns are ignored.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use crate::core::contig::ContigRegistry;
use crate::error::Result;
use crate::parsing::{open_input, ParseError};
use crate::utils::validation::check_contig_limit;

/// Load a sizes file into a registry labelled with `assembly`.
///
/// # Errors
///
/// Returns `Error::Parse` for unreadable or malformed input and
/// `Error::DuplicateContig` if an id repeats.
pub fn parse_sizes_file(path: &Path, assembly: &str) -> Result<ContigRegistry> {
    let reader = open_input(path)?;
    let registry = parse_sizes(reader, assembly)?;
    info!(
        path = %path.display(),
        contigs = registry.len(),
        assembly,
        "loaded contig sizes"
    );
    Ok(registry)
}

/// Parse sizes from any reader.
///
/// # Errors
///
/// Returns `Error::Parse` if a line has fewer than 2 fields or an invalid length,
/// no contigs are found, or the contig limit is exceeded, and
/// `Error::DuplicateContig` if an id repeats.
pub fn parse_sizes<R: BufRead>(reader: R, assembly: &str) -> Result<ContigRegistry> {
    let mut sizes = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(ParseError::Io)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let mut fields = line.split_whitespace();
        let (Some(id), Some(length)) = (fields.next(), fields.next()) else {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            ))
            .into());
        };

        let length: u64 = length.parse().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid length on line {line_num}: '{length}'"))
        })?;

        if check_contig_limit(sizes.len()).is_some() {
            return Err(ParseError::TooManyContigs(sizes.len()).into());
        }

        sizes.push((id.to_string(), length));
    }

    if sizes.is_empty() {
        return Err(ParseError::InvalidFormat("No contigs found in sizes file".to_string()).into());
    }

    ContigRegistry::from_sizes(sizes, assembly)
}
