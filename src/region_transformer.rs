//! C7 — `RegionTransformer`: the public façade tying together
//! classification, diff scanning, copy-number detection, unit building, and
//! unit transformation for a single region.

use tracing::{debug, trace, warn};

use crate::classifier;
use crate::config::EngineConfig;
use crate::diff_scanner;
use crate::error::{GenomeWarpError, Result};
use crate::indel_copy_number;
use crate::model::{HomologousRegion, RegionType, Strand, Variant};
use crate::traits::FastaIndex;
use crate::unit_builder;
use crate::unit_transformer;

/// Per-region entry point. Holds the tunables `IndelCopyNumberDetector`
/// needs; stateless otherwise (§5, "no shared mutable state").
#[derive(Debug, Clone, Default)]
pub struct RegionTransformer {
    config: EngineConfig,
}

impl RegionTransformer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// §4.2 passthrough.
    pub fn classify_region(
        &self,
        region: &HomologousRegion,
        query_fasta: &dyn FastaIndex,
        target_fasta: &dyn FastaIndex,
    ) -> Result<RegionType> {
        classifier::classify_region(region, query_fasta, target_fasta)
    }

    /// §4.7's full `transform` contract.
    pub fn transform(
        &self,
        region: &HomologousRegion,
        variants: &[Variant],
        call_set_names: &[String],
        query_fasta: &dyn FastaIndex,
        target_fasta: &dyn FastaIndex,
    ) -> Result<Vec<Variant>> {
        self.check_preconditions(region, variants)?;

        if region.region_type == RegionType::AlignmentRequired {
            return Err(GenomeWarpError::Unsupported(
                "region requires alignment",
            ));
        }

        let any_mnv = variants.iter().any(Variant::is_mnv);
        if any_mnv
            && (region.region_type == RegionType::MismatchedBases || region.strand == Strand::Negative)
        {
            return Err(GenomeWarpError::Unsupported(
                "MNV in a MismatchedBases or negative-strand region",
            ));
        }

        let all_snv = variants.iter().all(Variant::is_snv);
        let ref_diffs = if all_snv && region.region_type == RegionType::Identical {
            Vec::new()
        } else {
            let mut diffs = diff_scanner::scan(region, query_fasta, target_fasta)?;
            let indel_diffs =
                indel_copy_number::detect(region, variants, query_fasta, target_fasta, &self.config)?;
            diffs.extend(indel_diffs);
            diffs
        };
        trace!(count = ref_diffs.len(), "ref diffs computed");

        let units = unit_builder::build(ref_diffs, variants, region)?;

        let mut target_variants = Vec::new();
        for unit in &units {
            let produced = unit_transformer::transform_unit(unit, call_set_names)?;
            target_variants.extend(produced);
        }

        target_variants.sort_by(|a, b| {
            (&a.reference_name, a.start, a.end).cmp(&(&b.reference_name, b.start, b.end))
        });

        for v in &target_variants {
            if !region.target.contains_pos(&v.reference_name, v.start) {
                warn!(
                    reference_name = %v.reference_name,
                    start = v.start,
                    "emitted variant migrated outside target interval, dropping region"
                );
                return Err(GenomeWarpError::Unsupported(
                    "emitted variant falls outside the target interval",
                ));
            }
        }

        debug!(count = target_variants.len(), "region transform complete");
        Ok(target_variants)
    }

    fn check_preconditions(&self, region: &HomologousRegion, variants: &[Variant]) -> Result<()> {
        if region.query.reference_name.is_empty() || region.target.reference_name.is_empty() {
            return Err(GenomeWarpError::InvalidInput(
                "region reference names must be non-empty".to_string(),
            ));
        }
        if region.region_type == RegionType::Unknown {
            return Err(GenomeWarpError::InvalidInput(
                "region type must be classified before transform".to_string(),
            ));
        }
        for v in variants {
            if v.reference_name != region.query.reference_name {
                return Err(GenomeWarpError::InvalidInput(format!(
                    "variant reference name {} does not match region query {}",
                    v.reference_name, region.query.reference_name
                )));
            }
            if !(region.query.start <= v.start && v.start < region.query.end) {
                return Err(GenomeWarpError::InvalidInput(format!(
                    "variant start {} outside region query [{}, {})",
                    v.start, region.query.start, region.query.end
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::model::{Allele, GenomeInterval, VariantCall};
    use crate::testutil::InMemoryFasta;

    fn allele(s: &str) -> Allele {
        Allele::new(s).unwrap()
    }

    #[test]
    fn scenario_identical_positive_strand_carry_over() {
        let region = HomologousRegion {
            query: GenomeInterval::new("chr1", 1, 40).unwrap(),
            target: GenomeInterval::new("chr1_same", 11, 50).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::Identical,
        };
        let v1 = Variant::new(
            "chr1",
            3,
            allele("G"),
            vec![allele("T")],
            vec![VariantCall::new("s1", vec![0, 1]), VariantCall::new("s2", vec![1, 0])],
        )
        .unwrap();
        let v2 = Variant::new(
            "chr1",
            8,
            allele("C"),
            vec![allele("T"), allele("G")],
            vec![VariantCall::new("s1", vec![2, 1]), VariantCall::new("s2", vec![2, 1])],
        )
        .unwrap();

        let q = InMemoryFasta::new([("chr1", "N")]);
        let t = InMemoryFasta::new([("chr1_same", "N")]);
        let rt = RegionTransformer::default();
        let out = rt
            .transform(&region, &[v1, v2], &["s1".into(), "s2".into()], &q, &t)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reference_name, "chr1_same");
        assert_eq!(out[0].start, 13);
        assert_eq!(out[1].start, 18);
        assert_eq!(out[0].calls[0].genotype, vec![0, 1]);
    }

    #[test]
    fn scenario_negative_strand_snv() {
        let region = HomologousRegion {
            query: GenomeInterval::new("chr2", 1, 43).unwrap(),
            target: GenomeInterval::new("chr2_revcomp", 10, 52).unwrap(),
            strand: Strand::Negative,
            region_type: RegionType::Identical,
        };
        let v = Variant::new(
            "chr2",
            3,
            allele("T"),
            vec![allele("C")],
            vec![
                VariantCall::new("s1", vec![0, 0]),
                VariantCall::new("s2", vec![0, 0]),
                VariantCall::new("s3", vec![0, 0]),
            ],
        )
        .unwrap();
        let q = InMemoryFasta::new([("chr2", "N")]);
        let t = InMemoryFasta::new([("chr2_revcomp", "N")]);
        let rt = RegionTransformer::default();
        let out = rt
            .transform(
                &region,
                &[v],
                &["s1".into(), "s2".into(), "s3".into()],
                &q,
                &t,
            )
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start, 49);
        assert_eq!(out[0].end, 50);
        assert_eq!(out[0].reference_bases.as_str(), "A");
        assert_eq!(out[0].alternate_bases[0].as_str(), "G");
    }

    #[test]
    fn mnv_in_mismatched_bases_region_is_unsupported() {
        // Step 3's guard trips before a RefDiff is ever computed: an MNV in a
        // MismatchedBases region needs alignment this engine doesn't do.
        let region = HomologousRegion {
            query: GenomeInterval::new("chr1", 0, 40).unwrap(),
            target: GenomeInterval::new("chr1t", 0, 40).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::MismatchedBases,
        };
        let variant = Variant::new(
            "chr1",
            27,
            allele("CATG"),
            vec![allele("C")],
            vec![VariantCall::new("s", vec![0, 1])],
        )
        .unwrap();
        let q = InMemoryFasta::new([("chr1", "AAAAAAAAAAAAAAAAAAAAAAAAAAACTGAAAAAAAAAA")]);
        let t = InMemoryFasta::new([("chr1t", "AAAAAAAAAAAAAAAAAAAAAAAAAAATAAAAAAAAAAA")]);
        let rt = RegionTransformer::default();
        let result = rt.transform(&region, &[variant], &["s".into()], &q, &t);
        assert!(matches!(result, Err(GenomeWarpError::Unsupported(_))));
    }

    #[test]
    fn scenario_ref_only_no_variant_at_a_mismatched_base() {
        // No variant is supplied at all: the individual is implicitly
        // homozygous reference everywhere in this confidently-called region.
        // The scanner finds one base where query and target reference
        // differ, so C7 fabricates a homozygous-alt call on the target side.
        let region = HomologousRegion {
            query: GenomeInterval::new("chr1", 0, 10).unwrap(),
            target: GenomeInterval::new("chr1t", 0, 10).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::MismatchedBases,
        };
        let q = InMemoryFasta::new([("chr1", "ACGTACGTAC")]);
        let t = InMemoryFasta::new([("chr1t", "ACGTTCGTAC")]);
        let rt = RegionTransformer::default();
        let out = rt.transform(&region, &[], &[], &q, &t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reference_name, "chr1t");
        assert_eq!(out[0].start, 4);
        // ref = the target assembly's own base; alt = the individual's
        // actual (query-reference-matching) base.
        assert_eq!(out[0].reference_bases.as_str(), "T");
        assert_eq!(out[0].alternate_bases[0].as_str(), "A");
        assert_eq!(out[0].calls[0].genotype, vec![1, 1]);
    }

    #[test]
    fn alignment_required_region_is_unsupported() {
        let region = HomologousRegion {
            query: GenomeInterval::new("chr1", 0, 10).unwrap(),
            target: GenomeInterval::new("chr1t", 0, 8).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::AlignmentRequired,
        };
        let q = InMemoryFasta::new([("chr1", "ACGTACGTAC")]);
        let t = InMemoryFasta::new([("chr1t", "ACGTACGT")]);
        let rt = RegionTransformer::default();
        let result = rt.transform(&region, &[], &[], &q, &t);
        assert!(matches!(result, Err(GenomeWarpError::Unsupported(_))));
    }

    #[test]
    fn variant_outside_query_interval_is_invalid_input() {
        let region = HomologousRegion {
            query: GenomeInterval::new("chr1", 0, 10).unwrap(),
            target: GenomeInterval::new("chr1t", 0, 10).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::Identical,
        };
        let variant = Variant::new("chr1", 20, allele("A"), vec![allele("T")], vec![]).unwrap();
        let q = InMemoryFasta::new([("chr1", "ACGTACGTAC")]);
        let t = InMemoryFasta::new([("chr1t", "ACGTACGTAC")]);
        let rt = RegionTransformer::default();
        let result = rt.transform(&region, &[variant], &[], &q, &t);
        assert!(matches!(result, Err(GenomeWarpError::InvalidInput(_))));
    }
}
