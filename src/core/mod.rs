//! Core data types for summary statistics conversion.
//!
//! - [`Contig`], [`ContigRegistry`]: contigs of one assembly, loaded from a sizes file
//! - [`ChromConvert`]: chromosome naming convention applied to input records
//! - [`ColumnKey`]: where each semantic field sits in an input file
//! - [`SummaryStats`]: association statistics and their derivation lattice
//! - [`Variant`]: one output record
//! - [`RecordBuilder`]: tokens to [`Variant`]
//!
//! ## Contig Naming
//!
//! | Source | Chromosome 1 | Mitochondrial |
//! |--------|--------------|---------------|
//! | UCSC   | chr1         | chrM          |
//! | NCBI   | 1            | MT            |
//!
//! The registry is keyed by the exact ids of its sizes file. The naming convention is
//! applied to the chromosome of each input record before it is looked up, never to
//! the registry.
//!
//! [`Contig`]: contig::Contig
//! [`ContigRegistry`]: contig::ContigRegistry
//! [`ChromConvert`]: chrom::ChromConvert
//! [`ColumnKey`]: columns::ColumnKey
//! [`SummaryStats`]: stats::SummaryStats
//! [`Variant`]: variant::Variant
//! [`RecordBuilder`]: record::RecordBuilder

pub mod chrom;
pub mod columns;
pub mod contig;
pub mod record;
pub mod stats;
pub mod variant;
