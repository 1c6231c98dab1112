use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::chrom::ChromConvert;
use crate::error::{Error, Result};

/// A single contig of a reference assembly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contig {
    /// Contig id exactly as given in the sizes file
    pub id: String,

    /// Sequence length in bases
    pub length: u64,

    /// Assembly label shared by every contig of a registry
    pub assembly: String,
}

impl Contig {
    pub fn new(id: impl Into<String>, length: u64, assembly: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            length,
            assembly: assembly.into(),
        }
    }
}

/// The contigs of one assembly, keyed by raw id and kept in load order.
///
/// Built once per run and shared read-only between pipeline workers. Variants hold
/// `Arc<Contig>` handles into the registry rather than owning copies.
#[derive(Debug, Clone, Default)]
pub struct ContigRegistry {
    assembly: String,
    contigs: Vec<Arc<Contig>>,
    id_to_index: HashMap<String, usize>,
}

impl ContigRegistry {
    /// Build a registry from `(id, length)` pairs, all labelled with `assembly`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateContig` if an id appears more than once. No partial
    /// registry is returned.
    pub fn from_sizes<I, S>(sizes: I, assembly: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut registry = Self {
            assembly: assembly.to_string(),
            ..Self::default()
        };
        for (id, length) in sizes {
            registry.insert(Contig::new(id, length, assembly))?;
        }
        Ok(registry)
    }

    /// Build a registry from already constructed contigs, keeping each contig's own
    /// assembly label. Used for `##contig` header lines, which carry their assembly.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateContig` if an id appears more than once.
    pub fn from_contigs(contigs: Vec<Contig>, assembly: &str) -> Result<Self> {
        let mut registry = Self {
            assembly: assembly.to_string(),
            ..Self::default()
        };
        for contig in contigs {
            registry.insert(contig)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, contig: Contig) -> Result<()> {
        if self.id_to_index.contains_key(&contig.id) {
            return Err(Error::DuplicateContig { id: contig.id });
        }
        self.id_to_index
            .insert(contig.id.clone(), self.contigs.len());
        self.contigs.push(Arc::new(contig));
        Ok(())
    }

    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    /// Exact lookup by raw id
    pub fn get(&self, id: &str) -> Option<&Arc<Contig>> {
        self.id_to_index.get(id).map(|&idx| &self.contigs[idx])
    }

    /// Look up an input chromosome name after applying the run's naming convention.
    ///
    /// The registry itself is never renamed: `convert` is applied to the query only, so
    /// a sizes file keyed `chr1` is reached from input `1` under [`ChromConvert::Ucsc`],
    /// while a sizes file keyed `1` is not.
    pub fn resolve(&self, chrom: &str, convert: ChromConvert) -> Option<&Arc<Contig>> {
        self.get(&convert.apply(chrom))
    }

    /// Contigs in load order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Contig>> {
        self.contigs.iter()
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_load_order() {
        let registry =
            ContigRegistry::from_sizes([("chr2", 200), ("chr1", 100), ("chrX", 50)], "hg38")
                .unwrap();
        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["chr2", "chr1", "chrX"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("chr1").unwrap().length, 100);
        assert_eq!(registry.get("chr1").unwrap().assembly, "hg38");
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let result = ContigRegistry::from_sizes([("chr1", 100), ("chr2", 5), ("chr1", 100)], "hg38");
        match result {
            Err(Error::DuplicateContig { id }) => assert_eq!(id, "chr1"),
            other => panic!("expected duplicate contig error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_normalizes_query_not_registry() {
        let ucsc = ContigRegistry::from_sizes([("chr1", 248_956_422)], "hg38").unwrap();
        assert_eq!(ucsc.resolve("1", ChromConvert::Ucsc).unwrap().id, "chr1");
        assert_eq!(ucsc.resolve("chr1", ChromConvert::None).unwrap().id, "chr1");
        assert!(ucsc.resolve("1", ChromConvert::None).is_none());

        let simple = ContigRegistry::from_sizes([("1", 248_956_422)], "GRCh38").unwrap();
        assert!(simple.resolve("1", ChromConvert::Ucsc).is_none());
        assert_eq!(simple.resolve("chr1", ChromConvert::Simple).unwrap().id, "1");
    }

    #[test]
    fn test_from_contigs_keeps_assembly_labels() {
        let registry = ContigRegistry::from_contigs(
            vec![Contig::new("chr1", 10, "hg19"), Contig::new("chr2", 20, "hg19")],
            "hg19",
        )
        .unwrap();
        assert_eq!(registry.assembly(), "hg19");
        assert!(!registry.is_empty());
        assert_eq!(registry.get("chr2").unwrap().assembly, "hg19");
    }
}
