//! Chromosome naming conventions.
//!
//! | Convention | Chromosome 1 | Chromosome X |
//! |------------|--------------|--------------|
//! | UCSC       | chr1         | chrX         |
//! | simple     | 1            | X            |
//!
//! Both transforms are idempotent, and each undoes the other on names that
//! follow the opposite convention.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const UCSC_PREFIX: &str = "chr";

/// Prefix `chr` unless the name already carries it
pub fn to_ucsc(name: &str) -> Cow<'_, str> {
    if name.starts_with(UCSC_PREFIX) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{UCSC_PREFIX}{name}"))
    }
}

/// Strip a leading `chr` if present
pub fn to_simple(name: &str) -> &str {
    name.strip_prefix(UCSC_PREFIX).unwrap_or(name)
}

/// Naming convention applied uniformly to every record of a run
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ChromConvert {
    /// Leave chromosome names untouched
    #[default]
    None,
    /// chr1, chr2, ..., chrX
    Ucsc,
    /// 1, 2, ..., X
    Simple,
}

impl ChromConvert {
    #[must_use]
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::None => Cow::Borrowed(name),
            Self::Ucsc => to_ucsc(name),
            Self::Simple => Cow::Borrowed(to_simple(name)),
        }
    }
}

impl FromStr for ChromConvert {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ucsc" => Ok(Self::Ucsc),
            "simple" => Ok(Self::Simple),
            other => Err(Error::Configuration(format!(
                "unknown chromosome naming mode '{other}' (expected none, ucsc or simple)"
            ))),
        }
    }
}

impl std::fmt::Display for ChromConvert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ucsc => write!(f, "ucsc"),
            Self::Simple => write!(f, "simple"),
        }
    }
}
