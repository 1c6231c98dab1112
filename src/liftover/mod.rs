//! Coordinate liftover between assemblies.
//!
//! The chain engine is abstracted behind [`ChainLookup`]; [`chain::ChainFile`] is the
//! UCSC chain implementation. [`lift_variant`] applies a lookup to one variant and
//! either relocates it onto the target registry or reports it as unmapped.

pub mod chain;

use std::sync::Arc;

use crate::core::contig::ContigRegistry;
use crate::core::variant::Variant;
use crate::error::{Error, Result};

/// Answers "where does this source position land in the target assembly?"
///
/// Positions are 1-based on both sides. Candidates are returned best first; an
/// empty result means the position does not map.
pub trait ChainLookup: Send + Sync {
    fn lookup(&self, contig: &str, position: u64) -> Vec<(String, u64)>;
}

/// Result of lifting a single variant
#[derive(Debug, Clone, PartialEq)]
pub enum LiftOutcome {
    /// The variant relocated onto a target contig
    Mapped(Variant),
    /// No chain covers the variant; carries the variant in source coordinates
    Unmapped(Variant),
}

/// Lift `variant` onto `target`, taking the first candidate the lookup returns.
///
/// # Errors
///
/// Returns `Error::LookupInconsistency` if the chosen candidate names a contig the
/// target registry does not contain.
pub fn lift_variant(
    variant: &Variant,
    chains: &dyn ChainLookup,
    target: &ContigRegistry,
) -> Result<LiftOutcome> {
    let candidates = chains.lookup(&variant.contig.id, variant.position);
    let Some((contig_id, position)) = candidates.into_iter().next() else {
        return Ok(LiftOutcome::Unmapped(variant.clone()));
    };

    let contig = target
        .get(&contig_id)
        .ok_or_else(|| Error::LookupInconsistency {
            contig: variant.contig.id.clone(),
            position: variant.position,
            target: contig_id.clone(),
        })?;

    Ok(LiftOutcome::Mapped(variant.relocated(Arc::clone(contig), position)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::Contig;
    use crate::core::stats::SummaryStats;
    use std::collections::HashMap;

    struct FixedLookup(HashMap<(String, u64), Vec<(String, u64)>>);

    impl FixedLookup {
        fn new(entries: Vec<((&str, u64), Vec<(&str, u64)>)>) -> Self {
            Self(
                entries
                    .into_iter()
                    .map(|((c, p), hits)| {
                        (
                            (c.to_string(), p),
                            hits.into_iter().map(|(t, q)| (t.to_string(), q)).collect(),
                        )
                    })
                    .collect(),
            )
        }
    }

    impl ChainLookup for FixedLookup {
        fn lookup(&self, contig: &str, position: u64) -> Vec<(String, u64)> {
            self.0
                .get(&(contig.to_string(), position))
                .cloned()
                .unwrap_or_default()
        }
    }

    fn variant(position: u64) -> Variant {
        Variant {
            contig: Arc::new(Contig::new("chr1", 249_250_621, "hg19")),
            position,
            name: Some("rs1".into()),
            reference_allele: Some("G".into()),
            alternate_allele: Some("A".into()),
            filter: None,
            quality: None,
            info: SummaryStats {
                beta: Some(0.1),
                stderr: Some(0.05),
                ..SummaryStats::default()
            },
        }
    }

    fn hg38() -> ContigRegistry {
        ContigRegistry::from_sizes([("chr1", 248_956_422), ("chr2", 242_193_529)], "hg38")
            .unwrap()
    }

    #[test]
    fn test_unmapped_keeps_source_coordinates() {
        let lookup = FixedLookup::new(Vec::new());
        let source = variant(100);
        match lift_variant(&source, &lookup, &hg38()).unwrap() {
            LiftOutcome::Unmapped(v) => {
                assert_eq!(v, source);
                assert_eq!(v.contig.assembly, "hg19");
                assert_eq!(v.position, 100);
            }
            other => panic!("expected unmapped, got {other:?}"),
        }
    }

    #[test]
    fn test_first_candidate_wins() {
        let lookup = FixedLookup::new(vec![(("chr1", 100), vec![("chr2", 500), ("chr1", 90)])]);
        match lift_variant(&variant(100), &lookup, &hg38()).unwrap() {
            LiftOutcome::Mapped(v) => {
                assert_eq!(v.contig.id, "chr2");
                assert_eq!(v.contig.assembly, "hg38");
                assert_eq!(v.position, 500);
                assert_eq!(v.name.as_deref(), Some("rs1"));
                assert_eq!(v.info, variant(100).info);
            }
            other => panic!("expected mapped, got {other:?}"),
        }
    }

    #[test]
    fn test_target_contig_missing_is_inconsistency() {
        let lookup = FixedLookup::new(vec![(("chr1", 100), vec![("chrUn_gl000220", 5)])]);
        match lift_variant(&variant(100), &lookup, &hg38()) {
            Err(Error::LookupInconsistency {
                contig,
                position,
                target,
            }) => {
                assert_eq!(contig, "chr1");
                assert_eq!(position, 100);
                assert_eq!(target, "chrUn_gl000220");
            }
            other => panic!("expected lookup inconsistency, got {other:?}"),
        }
    }
}
