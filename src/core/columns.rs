//! Resolution of declared column names against an input header.

use serde::{Deserialize, Serialize};

use crate::parsing::metadata::ColumnMapping;

/// Semantic fields of a summary statistics record, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Chrom,
    Pos,
    Id,
    EffAllele,
    OtherAllele,
    Beta,
    BetaSe,
    Zscore,
    Pval,
    Logp,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Chrom,
        Field::Pos,
        Field::Id,
        Field::EffAllele,
        Field::OtherAllele,
        Field::Beta,
        Field::BetaSe,
        Field::Zscore,
        Field::Pval,
        Field::Logp,
    ];

    /// Metadata key naming this field
    pub fn key(self) -> &'static str {
        match self {
            Field::Chrom => "chrom",
            Field::Pos => "pos",
            Field::Id => "id",
            Field::EffAllele => "eff_allele",
            Field::OtherAllele => "other_allele",
            Field::Beta => "beta",
            Field::BetaSe => "beta_se",
            Field::Zscore => "zscore",
            Field::Pval => "pval",
            Field::Logp => "logp",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Token position of every semantic field in one input file, or `None` when the
/// field is absent (not declared, or declared but not in the header).
///
/// Resolved once from the header line; read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnKey {
    positions: [Option<usize>; 10],
}

impl ColumnKey {
    /// Resolve declared names against header tokens. Never fails: a declared name
    /// missing from the header resolves to absent. Duplicate header names resolve
    /// to their first occurrence.
    pub fn resolve<S: AsRef<str>>(mapping: &ColumnMapping, header: &[S]) -> Self {
        let mut positions = [None; 10];
        for field in Field::ALL {
            positions[field.index()] = mapping
                .declared(field)
                .and_then(|name| header.iter().position(|token| token.as_ref() == name));
        }
        Self { positions }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.positions[field.index()]
    }

    pub fn is_present(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Fields in fixed order with their resolved positions
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<usize>)> + '_ {
        Field::ALL.iter().map(move |&field| (field, self.get(field)))
    }
}
