//! C1 — `RefDiff`: a single base-level difference between query and target
//! reference at a query position.

use crate::error::{GenomeWarpError, Result};
use crate::model::{Allele, Variant};

/// A tagged description of one reference-assembly difference, or the
/// `NoDiff` sentinel meaning "no difference here".
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RefDiff {
    /// Not a real difference; used as a placeholder unit key for variants
    /// that land on an otherwise-identical stretch of reference.
    NoDiff,
    Snv {
        query_pos: i64,
        query_base: char,
        target_base: char,
    },
    Insertion {
        query_pos: i64,
        query_bases: Allele,
        target_bases: Allele,
    },
    Deletion {
        query_pos: i64,
        query_bases: Allele,
        target_bases: Allele,
    },
}

impl RefDiff {
    /// The `NoDiff` sentinel, equal only to itself.
    pub const NO_DIFF: RefDiff = RefDiff::NoDiff;

    /// Constructs a `RefDiff` from a query position and the query/target
    /// bases observed there.
    ///
    /// Both alleles must be non-empty (enforced by `Allele`); at least one
    /// side must have length 1 — complex, both-sides-multi-base reference
    /// changes are rejected. Equal lengths require case-insensitively
    /// unequal single bases (`Snv`); unequal lengths require the shared
    /// anchor base to match (`Insertion`/`Deletion`).
    pub fn create(query_pos: i64, query_bases: Allele, target_bases: Allele) -> Result<RefDiff> {
        if query_bases.len() > 1 && target_bases.len() > 1 {
            return Err(GenomeWarpError::InvalidRefDiff(format!(
                "both sides multi-base at {query_pos}: {query_bases} / {target_bases}"
            )));
        }

        if query_bases.len() == target_bases.len() {
            if query_bases.len() != 1 {
                return Err(GenomeWarpError::InvalidRefDiff(format!(
                    "equal-length ref diff must be a single base at {query_pos}"
                )));
            }
            if query_bases.eq_ignore_case(&target_bases) {
                return Err(GenomeWarpError::InvalidRefDiff(format!(
                    "SNV bases must differ at {query_pos}: both {query_bases}"
                )));
            }
            return Ok(RefDiff::Snv {
                query_pos,
                query_base: query_bases.to_uppercase().chars().next().unwrap(),
                target_base: target_bases.to_uppercase().chars().next().unwrap(),
            });
        }

        let anchors_match = query_bases.to_uppercase().as_bytes()[0]
            == target_bases.to_uppercase().as_bytes()[0];
        if !anchors_match {
            return Err(GenomeWarpError::InvalidRefDiff(format!(
                "anchor base mismatch at {query_pos}: {query_bases} / {target_bases}"
            )));
        }

        if target_bases.len() > query_bases.len() {
            if query_bases.len() != 1 {
                return Err(GenomeWarpError::InvalidRefDiff(format!(
                    "insertion must have a single-base query anchor at {query_pos}"
                )));
            }
            Ok(RefDiff::Insertion {
                query_pos,
                query_bases,
                target_bases,
            })
        } else {
            if target_bases.len() != 1 {
                return Err(GenomeWarpError::InvalidRefDiff(format!(
                    "deletion must have a single-base target anchor at {query_pos}"
                )));
            }
            Ok(RefDiff::Deletion {
                query_pos,
                query_bases,
                target_bases,
            })
        }
    }

    pub fn is_snv(&self) -> bool {
        matches!(self, RefDiff::Snv { .. })
    }

    pub fn is_insertion(&self) -> bool {
        matches!(self, RefDiff::Insertion { .. })
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, RefDiff::Deletion { .. })
    }

    /// The query-side span `[query_pos, query_pos + |query_bases|)` this
    /// diff occupies. `NoDiff` has no span and never overlaps anything.
    fn span(&self) -> Option<(i64, i64)> {
        match self {
            RefDiff::NoDiff => None,
            RefDiff::Snv { query_pos, .. } => Some((*query_pos, *query_pos + 1)),
            RefDiff::Insertion {
                query_pos,
                query_bases,
                ..
            }
            | RefDiff::Deletion {
                query_pos,
                query_bases,
                ..
            } => Some((*query_pos, *query_pos + query_bases.len() as i64)),
        }
    }

    /// `true` iff this diff overlaps `variant`: `query_pos < variant.end`
    /// and `query_pos + |query_bases| > variant.start`. `NoDiff` never
    /// overlaps.
    pub fn overlaps(&self, variant: &Variant) -> bool {
        match self.span() {
            None => false,
            Some((start, end)) => start < variant.end && end > variant.start,
        }
    }
}
