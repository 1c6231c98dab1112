//! Centralized input limits and run-parameter checks.

use crate::error::{Error, Result};

/// Maximum number of contigs allowed in a single sizes file or VCF header
pub const MAX_CONTIGS: usize = 100_000;

/// Lines per batch when none is given
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_contig_limit(contigs.len()).is_some() {
///     return Err(...);
/// }
/// contigs.push(new_contig); // Safe to add
/// ```
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

/// Lines per batch must be at least one.
///
/// # Errors
///
/// Returns `Error::Configuration` for a zero batch size.
pub fn validate_batch_size(batch_size: usize) -> Result<usize> {
    if batch_size == 0 {
        return Err(Error::Configuration(
            "batch size must be at least 1".to_string(),
        ));
    }
    Ok(batch_size)
}

/// An explicit worker count must be at least one; `None` means one worker per CPU.
///
/// # Errors
///
/// Returns `Error::Configuration` for `Some(0)`.
pub fn validate_threads(threads: Option<usize>) -> Result<Option<usize>> {
    match threads {
        Some(0) => Err(Error::Configuration(
            "thread count must be at least 1".to_string(),
        )),
        other => Ok(other),
    }
}
