//! C3 — `AssemblyDiffScanner`: enumerates per-base `RefDiff::Snv`s between
//! query and (possibly reverse-complemented) target sequence.

use tracing::trace;

use crate::dna;
use crate::error::{GenomeWarpError, Result};
use crate::model::{HomologousRegion, RegionType, Strand};
use crate::refdiff::RefDiff;
use crate::traits::FastaIndex;

/// Scans `region` (which must be `Identical` or `MismatchedBases`) for
/// per-base differences. `Identical` regions are the fast path: they always
/// return an empty list without fetching sequence.
pub fn scan(
    region: &HomologousRegion,
    query_fasta: &dyn FastaIndex,
    target_fasta: &dyn FastaIndex,
) -> Result<Vec<RefDiff>> {
    match region.region_type {
        RegionType::Identical => Ok(Vec::new()),
        RegionType::MismatchedBases => scan_mismatched(region, query_fasta, target_fasta),
        other => Err(GenomeWarpError::InvalidInput(format!(
            "AssemblyDiffScanner requires Identical or MismatchedBases, got {other}"
        ))),
    }
}

fn scan_mismatched(
    region: &HomologousRegion,
    query_fasta: &dyn FastaIndex,
    target_fasta: &dyn FastaIndex,
) -> Result<Vec<RefDiff>> {
    let q = query_fasta.get(
        &region.query.reference_name,
        region.query.start,
        region.query.end,
    )?;
    let t_raw = target_fasta.get(
        &region.target.reference_name,
        region.target.start,
        region.target.end,
    )?;

    if !dna::is_dna_only(&q) {
        return Err(GenomeWarpError::DnaInvalid {
            reference_name: region.query.reference_name.clone(),
            position: region.query.start,
        });
    }
    if !dna::is_dna_only(&t_raw) {
        return Err(GenomeWarpError::DnaInvalid {
            reference_name: region.target.reference_name.clone(),
            position: region.target.start,
        });
    }

    let t = match region.strand {
        Strand::Positive => t_raw,
        Strand::Negative => dna::reverse_complement(&t_raw),
    };

    let q_bytes = q.as_bytes();
    let t_bytes = t.as_bytes();
    let mut diffs = Vec::new();
    for (i, (&qb, &tb)) in q_bytes.iter().zip(t_bytes.iter()).enumerate() {
        if !qb.eq_ignore_ascii_case(&tb) {
            diffs.push(RefDiff::Snv {
                query_pos: region.query.start + i as i64,
                query_base: (qb as char).to_ascii_uppercase(),
                target_base: (tb as char).to_ascii_uppercase(),
            });
        }
    }
    trace!(count = diffs.len(), "assembly diff scan complete");
    Ok(diffs)
}
