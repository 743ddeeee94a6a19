//! External interfaces the core depends on (§6).
//!
//! These are plain traits, not a `Box<dyn Trait>` registry: a driver is free
//! to use dynamic dispatch if it wants to, but nothing in this crate forces
//! it to.

use crate::error::Result;
use crate::model::{GenomeInterval, HomologousRegion, Variant};

/// Sentinel value returned by `FastaIndex::get` for an unknown chromosome,
/// per §6's literal "sentinel empty string" contract. Exported so
/// implementations can match the spec's wording directly instead of
/// threading an error variant through for this one expected case.
pub const MISSING_CHROMOSOME_SENTINEL: &str = "";

/// Read-only reference-sequence oracle.
///
/// Implementations must uppercase returned bases and must cache "unknown
/// chromosome" results to avoid repeatedly re-reading the underlying file
/// (§6).
pub trait FastaIndex {
    /// Returns the uppercased bases over `[start, end)` on `reference_name`.
    ///
    /// `start == -1` means "from 0"; `end == -1` means "to chromosome end".
    /// `end` beyond the chromosome length is clamped. An unknown chromosome
    /// returns `Ok(MISSING_CHROMOSOME_SENTINEL)`. DOS line endings in the
    /// underlying file are reported as `GenomeWarpError::BadFasta`.
    fn get(&self, reference_name: &str, start: i64, end: i64) -> Result<String>;

    /// Returns the chromosome length, or `-1` if `reference_name` is absent.
    fn chromosome_size(&self, reference_name: &str) -> i64;

    /// Returns reference name -> length in the index's natural order.
    fn reference_order(&self) -> indexmap::IndexMap<String, i64>;
}

/// Supplies `(HomologousRegion, variants)` pairs to a driver.
///
/// Regions arrive with `region_type` unset (`RegionType::Unknown` is used as
/// the "not yet classified" placeholder by convention); the core fills it in
/// via `RegionClassifier::classify`. This trait is an external collaborator
/// boundary, not implemented by this crate.
pub trait RegionProvider {
    fn next_region(&mut self) -> Option<(HomologousRegion, Vec<Variant>)>;
}

/// Consumes target-side variants and target-side regions.
///
/// An external collaborator boundary; this crate only ever produces values
/// of these types and hands them back to the caller.
pub trait VariantSink {
    fn accept_variants(&mut self, variants: &[Variant]);
    fn accept_region(&mut self, region: &GenomeInterval);
}

/// Ordered call-set names; the i-th call in every produced `Variant` is
/// assigned the i-th name (§6).
pub type CallSetNames = Vec<String>;
