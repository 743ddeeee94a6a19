//! Per-region variant transformation engine for cross-genome-assembly VCF
//! liftover.
//!
//! Given a [`model::HomologousRegion`] (a query interval paired with its
//! lifted target interval, strand, and classification) and the variants
//! called inside it, this crate classifies the region, finds reference
//! differences between the two assemblies, partitions variants against
//! those differences, and re-emits each variant in target-assembly
//! coordinates. [`region_transformer::RegionTransformer`] is the entry
//! point; everything else is implementation detail reachable for testing
//! and composition.
//!
//! Liftover coordinate mapping itself, FASTA file I/O, and VCF parsing are
//! out of scope -- see [`traits`] for the interfaces this crate expects a
//! driver to supply.

pub mod classifier;
pub mod config;
pub mod diff_scanner;
pub mod dna;
pub mod error;
pub mod indel_copy_number;
pub mod model;
pub mod refdiff;
pub mod region_transformer;
pub mod traits;
pub mod unit_builder;
pub mod unit_transformer;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{GenomeWarpError, Result};
pub use model::{
    Allele, GenomeInterval, HomologousRegion, InfoMap, InfoValue, RegionType, Strand, Variant,
    VariantCall,
};
pub use region_transformer::RegionTransformer;
pub use traits::{CallSetNames, FastaIndex, RegionProvider, VariantSink, MISSING_CHROMOSOME_SENTINEL};
