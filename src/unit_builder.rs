//! C5 — `UnitBuilder`: partitions a `RefDiff` list and a `Variant` list into
//! `TransformationUnit`s.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{GenomeWarpError, Result};
use crate::model::{HomologousRegion, Variant};
use crate::refdiff::RefDiff;

/// The atom paired with a single reference difference (possibly `NoDiff`)
/// and the variants overlapping it.
///
/// Construction invariant: every variant lies strictly inside
/// `region.query` (reference name equal; `start` in
/// `[region.query.start, region.query.end)`), and either `ref_diff` is
/// `NoDiff` or every variant overlaps `ref_diff`. Both are upheld by
/// construction in this module and in `RegionTransformer`'s preconditions.
#[derive(Debug, Clone)]
pub struct TransformationUnit {
    pub ref_diff: RefDiff,
    pub variants: Vec<Variant>,
    pub region: HomologousRegion,
}

/// Builds units from `ref_diffs` (in query-position order) and `variants`.
///
/// Returns `Unsupported` if a variant overlaps two or more distinct
/// `RefDiff`s (§4.5 step 3) — that shape is not handled by this engine.
pub fn build(
    ref_diffs: Vec<RefDiff>,
    variants: &[Variant],
    region: &HomologousRegion,
) -> Result<Vec<TransformationUnit>> {
    if has_duplicates(variants) {
        return Err(GenomeWarpError::InvalidInput(
            "duplicate variants in region".to_string(),
        ));
    }

    let mut unassigned: HashSet<usize> = (0..variants.len()).collect();
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut units = Vec::with_capacity(ref_diffs.len() + 1);

    for diff in ref_diffs {
        let matched: Vec<usize> = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| diff.overlaps(v))
            .map(|(i, _)| i)
            .collect();

        if matched.iter().any(|i| consumed.contains(i)) {
            debug!(?diff, "variant overlaps two distinct ref diffs, unsupported");
            return Err(GenomeWarpError::Unsupported(
                "variant overlaps two distinct reference differences",
            ));
        }

        for &i in &matched {
            unassigned.remove(&i);
            consumed.insert(i);
        }

        let matched_variants = matched.into_iter().map(|i| variants[i].clone()).collect();
        units.push(TransformationUnit {
            ref_diff: diff,
            variants: matched_variants,
            region: region.clone(),
        });
    }

    if !unassigned.is_empty() {
        let mut remaining: Vec<usize> = unassigned.into_iter().collect();
        remaining.sort_unstable();
        trace!(count = remaining.len(), "trailing NoDiff unit for unassigned variants");
        units.push(TransformationUnit {
            ref_diff: RefDiff::NoDiff,
            variants: remaining.into_iter().map(|i| variants[i].clone()).collect(),
            region: region.clone(),
        });
    }

    Ok(units)
}

fn has_duplicates(variants: &[Variant]) -> bool {
    for i in 0..variants.len() {
        for j in (i + 1)..variants.len() {
            if variants[i] == variants[j] {
                return true;
            }
        }
    }
    false
}
