//! C2 — `RegionClassifier`: decides a region's `RegionType` from both FASTA
//! indexes.

use tracing::trace;

use crate::dna;
use crate::error::Result;
use crate::model::{HomologousRegion, RegionType, Strand};
use crate::traits::{FastaIndex, MISSING_CHROMOSOME_SENTINEL};

/// Classifies `region` against `query_fasta` / `target_fasta` (§4.2).
///
/// `region.region_type` is expected to be unset by convention
/// (`RegionType::Unknown`); this function does not read it and always
/// returns a fresh classification.
pub fn classify_region(
    region: &HomologousRegion,
    query_fasta: &dyn FastaIndex,
    target_fasta: &dyn FastaIndex,
) -> Result<RegionType> {
    if region.query.length() != region.target.length() {
        trace!(
            query = ?region.query,
            target = ?region.target,
            "length mismatch, classifying AlignmentRequired"
        );
        return Ok(RegionType::AlignmentRequired);
    }

    let q = query_fasta.get(
        &region.query.reference_name,
        region.query.start,
        region.query.end,
    )?;
    let t = target_fasta.get(
        &region.target.reference_name,
        region.target.start,
        region.target.end,
    )?;

    if t == MISSING_CHROMOSOME_SENTINEL {
        trace!(target = %region.target.reference_name, "missing target chromosome, classifying Unknown");
        return Ok(RegionType::Unknown);
    }

    if !dna::is_dna_only(&q) || !dna::is_dna_only(&t) {
        trace!("non-ACGT base present, classifying Unknown");
        return Ok(RegionType::Unknown);
    }

    let t_canonical = match region.strand {
        Strand::Positive => t,
        Strand::Negative => dna::reverse_complement(&t),
    };

    if q.eq_ignore_ascii_case(&t_canonical) {
        trace!("bases match, classifying Identical");
        Ok(RegionType::Identical)
    } else {
        trace!("bases differ, classifying MismatchedBases");
        Ok(RegionType::MismatchedBases)
    }
}
