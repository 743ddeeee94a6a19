//! C6 — `UnitTransformer`: emits target-assembly variants for a single
//! `TransformationUnit`, or signals `Unsupported`/`Invalid`.

use itertools::Itertools;
use tracing::trace;

use crate::error::{GenomeWarpError, Result};
use crate::model::{Allele, HomologousRegion, RegionType, Strand, Variant, VariantCall};
use crate::refdiff::RefDiff;
use crate::unit_builder::TransformationUnit;

/// Converts a query-side position to its target-side position (§4.6,
/// "Coordinate/strand transform").
pub fn position_convert(region: &HomologousRegion, query_pos: i64) -> i64 {
    match region.strand {
        Strand::Positive => region.target.start + (query_pos - region.query.start),
        Strand::Negative => region.target.end - (query_pos - region.query.start),
    }
}

/// Builds a target-side `Variant` from a `template` (whose non-allele fields
/// are kept as-is) and the resolved target reference/alternate alleles.
fn emit(
    region: &HomologousRegion,
    template: &Variant,
    query_start: i64,
    pos_ref: Allele,
    pos_alts: Vec<Allele>,
) -> Variant {
    let (start, reference_bases, alternate_bases) = match region.strand {
        Strand::Positive => {
            let start = position_convert(region, query_start);
            (start, pos_ref, pos_alts)
        }
        Strand::Negative => {
            let end = position_convert(region, query_start);
            let start = end - pos_ref.len() as i64;
            let reference_bases = pos_ref.reverse_complement();
            let alternate_bases = pos_alts.iter().map(Allele::reverse_complement).collect();
            (start, reference_bases, alternate_bases)
        }
    };
    let end = start + reference_bases.len() as i64;
    Variant {
        reference_name: region.target.reference_name.clone(),
        start,
        end,
        reference_bases,
        alternate_bases,
        filters: template.filters.clone(),
        quality: template.quality,
        info: template.info.clone(),
        names: template.names.clone(),
        calls: template.calls.clone(),
    }
}

/// Transforms a single unit, applying the decision table in §4.6, and
/// overwrites every produced variant's call-set names positionally from
/// `call_set_names`.
pub fn transform_unit(
    unit: &TransformationUnit,
    call_set_names: &[String],
) -> Result<Vec<Variant>> {
    let mut variants = transform_unit_inner(unit)?;
    for variant in &mut variants {
        for (call, name) in variant.calls.iter_mut().zip(call_set_names) {
            call.call_set_name = name.clone();
        }
    }
    Ok(variants)
}

fn transform_unit_inner(unit: &TransformationUnit) -> Result<Vec<Variant>> {
    let region = &unit.region;
    let ref_diff = &unit.ref_diff;
    let variants = &unit.variants;

    // G0
    if !matches!(
        region.region_type,
        RegionType::Identical | RegionType::MismatchedBases
    ) {
        return Err(GenomeWarpError::Unsupported(
            "region type is not Identical or MismatchedBases",
        ));
    }
    // G1
    if region.strand == Strand::Negative && variants.iter().any(Variant::is_mnv) {
        return Err(GenomeWarpError::Unsupported(
            "MNV on a negative-strand region",
        ));
    }
    // G2
    if region.strand == Strand::Negative
        && matches!(ref_diff, RefDiff::Insertion { .. } | RefDiff::Deletion { .. })
    {
        return Err(GenomeWarpError::Unsupported(
            "indel ref diff on a negative-strand region",
        ));
    }
    // G3
    if !matches!(ref_diff, RefDiff::NoDiff) && variants.len() > 1 {
        return Err(GenomeWarpError::Unsupported(
            "more than one variant overlapping a single ref diff",
        ));
    }

    if matches!(ref_diff, RefDiff::NoDiff) {
        trace!("unit transform: path A (UnchangedGenome)");
        return Ok(path_unchanged_genome(region, variants));
    }
    if variants.is_empty() {
        trace!("unit transform: path B (RefOnly)");
        return Ok(vec![path_ref_only(region, ref_diff)?]);
    }

    let variant = &variants[0];
    if ref_diff.is_snv() && variant.is_snv() {
        trace!("unit transform: path C (DualSnv)");
        return Ok(vec![path_dual_snv(region, ref_diff, variant)?]);
    }
    if is_matching_pos_indel(region, ref_diff, variant) {
        trace!("unit transform: path D (MatchingPosIndel)");
        return Ok(vec![path_matching_pos_indel(region, ref_diff, variant)?]);
    }

    Err(GenomeWarpError::Unsupported(
        "unit shape not handled by any decision-table path",
    ))
}

/// Path A: carries every variant over unchanged, converting coordinates and
/// strand only.
fn path_unchanged_genome(region: &HomologousRegion, variants: &[Variant]) -> Vec<Variant> {
    variants
        .iter()
        .map(|v| emit(region, v, v.start, v.reference_bases.clone(), v.alternate_bases.clone()))
        .collect()
}

/// Path B: the individual is homozygous reference at this query position,
/// but the target reference differs; fabricate a homozygous-alt call.
fn path_ref_only(region: &HomologousRegion, ref_diff: &RefDiff) -> Result<Variant> {
    let (query_pos, query_bases, target_bases) = ref_diff_alleles(ref_diff)?;
    let template = Variant {
        reference_name: region.query.reference_name.clone(),
        start: query_pos,
        end: query_pos,
        reference_bases: query_bases.clone(),
        alternate_bases: vec![target_bases.clone()],
        filters: vec!["PASS".to_string()],
        quality: None,
        info: crate::model::InfoMap::new(),
        names: Vec::new(),
        calls: vec![VariantCall {
            call_set_name: String::new(),
            genotype: vec![1, 1],
            phased: false,
            genotype_likelihoods: None,
        }],
    };
    Ok(emit(region, &template, query_pos, target_bases, vec![query_bases]))
}

/// Path C: both the reference change and the variant are single bases;
/// re-index genotypes against the new target allele table.
fn path_dual_snv(region: &HomologousRegion, ref_diff: &RefDiff, variant: &Variant) -> Result<Variant> {
    let RefDiff::Snv {
        query_base,
        target_base,
        ..
    } = ref_diff
    else {
        return Err(GenomeWarpError::Invalid("DualSnv requires an Snv ref diff"));
    };
    let ref_diff_query_base = Allele::new(query_base.to_string())?;
    if !ref_diff_query_base.eq_ignore_case(&variant.reference_bases) {
        return Err(GenomeWarpError::Invalid(
            "DualSnv ref diff query base does not match variant reference base",
        ));
    }

    // queryIndex -> base, 0 = reference, 1..N = alternates.
    let mut query_index_to_base: Vec<Allele> = vec![variant.reference_bases.clone()];
    query_index_to_base.extend(variant.alternate_bases.iter().cloned());

    let target_reference = Allele::new(target_base.to_string())?;

    // ASCII-sorted, de-duplicated set of query alleles minus the new target
    // reference (§4.6 Path C step 4; ordering choice recorded in DESIGN.md).
    let target_alts: Vec<Allele> = query_index_to_base
        .iter()
        .filter(|base| !base.eq_ignore_case(&target_reference))
        .unique_by(|base| base.to_uppercase())
        .sorted_by(|a, b| a.to_uppercase().cmp(&b.to_uppercase()))
        .cloned()
        .collect();

    let target_base_to_index = |base: &Allele| -> Option<i32> {
        if base.eq_ignore_case(&target_reference) {
            return Some(0);
        }
        target_alts
            .iter()
            .position(|a| a.eq_ignore_case(base))
            .map(|i| (i + 1) as i32)
    };

    let mut new_calls = Vec::with_capacity(variant.calls.len());
    for call in &variant.calls {
        let mut genotype = Vec::with_capacity(call.genotype.len());
        for &g in &call.genotype {
            if g == -1 {
                genotype.push(-1);
                continue;
            }
            let base = &query_index_to_base[g as usize];
            let idx = target_base_to_index(base).ok_or(GenomeWarpError::Invalid(
                "DualSnv could not resolve a genotype's base in the target allele table",
            ))?;
            genotype.push(idx);
        }
        new_calls.push(VariantCall {
            call_set_name: call.call_set_name.clone(),
            genotype,
            phased: call.phased,
            genotype_likelihoods: call.genotype_likelihoods.clone(),
        });
    }

    let template = Variant {
        calls: new_calls,
        ..variant.clone()
    };
    Ok(emit(region, &template, variant.start, target_reference, target_alts))
}

fn is_matching_pos_indel(region: &HomologousRegion, ref_diff: &RefDiff, variant: &Variant) -> bool {
    if region.strand != Strand::Positive || variant.alternate_bases.len() != 1 {
        return false;
    }
    match ref_diff {
        RefDiff::Insertion {
            query_bases,
            target_bases,
            ..
        }
        | RefDiff::Deletion {
            query_bases,
            target_bases,
            ..
        } => {
            query_bases.eq_ignore_case(&variant.reference_bases)
                && target_bases.eq_ignore_case(&variant.alternate_bases[0])
        }
        _ => false,
    }
}

/// Path D: the variant and the reference change describe the same indel;
/// after lift the two sides swap roles (genotyped-against-query becomes
/// genotyped-against-target).
fn path_matching_pos_indel(
    region: &HomologousRegion,
    ref_diff: &RefDiff,
    variant: &Variant,
) -> Result<Variant> {
    let (query_bases, target_bases) = match ref_diff {
        RefDiff::Insertion {
            query_bases,
            target_bases,
            ..
        }
        | RefDiff::Deletion {
            query_bases,
            target_bases,
            ..
        } => (query_bases.clone(), target_bases.clone()),
        _ => return Err(GenomeWarpError::Invalid("MatchingPosIndel requires an indel ref diff")),
    };

    let mut new_calls = Vec::with_capacity(variant.calls.len());
    for call in &variant.calls {
        let mut genotype = Vec::with_capacity(call.genotype.len());
        for &g in &call.genotype {
            let mapped = match g {
                -1 => -1,
                0 => 1,
                1 => 0,
                other => {
                    return Err(GenomeWarpError::Invalid(
                        if other >= 0 {
                            "MatchingPosIndel genotype index must be 0 or 1"
                        } else {
                            "MatchingPosIndel genotype index must be -1, 0, or 1"
                        },
                    ))
                }
            };
            genotype.push(mapped);
        }
        new_calls.push(VariantCall {
            call_set_name: call.call_set_name.clone(),
            genotype,
            phased: call.phased,
            genotype_likelihoods: call.genotype_likelihoods.clone(),
        });
    }

    let template = Variant {
        calls: new_calls,
        ..variant.clone()
    };
    Ok(emit(region, &template, variant.start, target_bases, vec![query_bases]))
}

fn ref_diff_alleles(ref_diff: &RefDiff) -> Result<(i64, Allele, Allele)> {
    match ref_diff {
        RefDiff::Snv {
            query_pos,
            query_base,
            target_base,
        } => Ok((
            *query_pos,
            Allele::new(query_base.to_string())?,
            Allele::new(target_base.to_string())?,
        )),
        RefDiff::Insertion {
            query_pos,
            query_bases,
            target_bases,
        }
        | RefDiff::Deletion {
            query_pos,
            query_bases,
            target_bases,
        } => Ok((*query_pos, query_bases.clone(), target_bases.clone())),
        RefDiff::NoDiff => Err(GenomeWarpError::Invalid("RefOnly requires a non-NoDiff ref diff")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::GenomeInterval;
    use crate::unit_builder::TransformationUnit;

    fn region_pos() -> HomologousRegion {
        HomologousRegion {
            query: GenomeInterval::new("chr1", 1, 40).unwrap(),
            target: GenomeInterval::new("chr1t", 11, 50).unwrap(),
            strand: Strand::Positive,
            region_type: RegionType::Identical,
        }
    }

    fn region_neg() -> HomologousRegion {
        HomologousRegion {
            query: GenomeInterval::new("chr2", 1, 43).unwrap(),
            target: GenomeInterval::new("chr2_rc", 10, 52).unwrap(),
            strand: Strand::Negative,
            region_type: RegionType::Identical,
        }
    }

    fn allele(s: &str) -> Allele {
        Allele::new(s).unwrap()
    }

    #[test]
    fn position_convert_positive_and_negative() {
        let r = region_pos();
        assert_eq!(position_convert(&r, 3), 11 + (3 - 1));

        let r = region_neg();
        assert_eq!(position_convert(&r, 3), 52 - (3 - 1));
    }

    #[test]
    fn path_a_unchanged_genome_positive_strand() {
        let region = region_pos();
        let variant = Variant::new(
            "chr1",
            3,
            allele("G"),
            vec![allele("T")],
            vec![VariantCall::new("orig", vec![0, 1])],
        )
        .unwrap();
        let unit = TransformationUnit {
            ref_diff: RefDiff::NoDiff,
            variants: vec![variant],
            region: region.clone(),
        };
        let out = transform_unit(&unit, &["sample1".to_string()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reference_name, "chr1t");
        assert_eq!(out[0].start, 11 + (3 - 1));
        assert_eq!(out[0].reference_bases.as_str(), "G");
        assert_eq!(out[0].calls[0].call_set_name, "sample1");
    }

    #[test]
    fn path_a_negative_strand_snv() {
        let region = region_neg();
        let variant = Variant::new(
            "chr2",
            3,
            allele("T"),
            vec![allele("C")],
            vec![VariantCall::new("orig", vec![0, 0])],
        )
        .unwrap();
        let unit = TransformationUnit {
            ref_diff: RefDiff::NoDiff,
            variants: vec![variant],
            region: region.clone(),
        };
        let out = transform_unit(&unit, &["s1".to_string()]).unwrap();
        assert_eq!(out.len(), 1);
        let v = &out[0];
        assert_eq!(v.reference_name, "chr2_rc");
        // positionConvert(-, 3) = 52 - (3-1) = 50; start = 50 - |ref|(1) = 49
        assert_eq!(v.start, 49);
        assert_eq!(v.end, 50);
        assert_eq!(v.reference_bases.as_str(), "A");
        assert_eq!(v.alternate_bases[0].as_str(), "G");
    }

    #[test]
    fn path_b_ref_only_insertion() {
        // query ref "A", target ref "ACTG" (target has one extra tandem
        // copy). The individual is homozygous query-reference, i.e. their
        // actual bases are "A" -- which is the *alternate* allele on the
        // target's allele table, since the target's own reference is "ACTG".
        let region = region_pos();
        let diff = RefDiff::create(11, allele("A"), allele("ACTG")).unwrap();
        let unit = TransformationUnit {
            ref_diff: diff,
            variants: vec![],
            region: region.clone(),
        };
        let out = transform_unit(&unit, &["s1".to_string()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reference_bases.as_str(), "ACTG");
        assert_eq!(out[0].alternate_bases[0].as_str(), "A");
        assert_eq!(out[0].calls[0].genotype, vec![1, 1]);
        assert_eq!(out[0].filters, vec!["PASS".to_string()]);
    }

    #[test]
    fn path_c_dual_snv() {
        let region = region_pos();
        let diff = RefDiff::create(17, allele("A"), allele("G")).unwrap();
        let variant = Variant::new(
            "chr1",
            17,
            allele("A"),
            vec![allele("G")],
            vec![
                VariantCall::new("c1", vec![0, 1]),
                VariantCall::new("c2", vec![1, 1]),
                VariantCall::new("c3", vec![1, 0]),
            ],
        )
        .unwrap();
        let unit = TransformationUnit {
            ref_diff: diff,
            variants: vec![variant],
            region: region.clone(),
        };
        let out = transform_unit(&unit, &["c1".into(), "c2".into(), "c3".into()]).unwrap();
        assert_eq!(out.len(), 1);
        let v = &out[0];
        assert_eq!(v.reference_bases.as_str(), "G");
        assert_eq!(v.alternate_bases[0].as_str(), "A");
        assert_eq!(v.calls[0].genotype, vec![1, 0]);
        assert_eq!(v.calls[1].genotype, vec![0, 0]);
        assert_eq!(v.calls[2].genotype, vec![0, 1]);
    }

    #[test]
    fn path_d_matching_pos_indel() {
        let region = region_pos();
        let diff = RefDiff::create(1, allele("ACTG"), allele("A")).unwrap();
        let variant = Variant::new(
            "chr1",
            1,
            allele("ACTG"),
            vec![allele("A")],
            vec![VariantCall::new("c1", vec![0, 1])],
        )
        .unwrap();
        let unit = TransformationUnit {
            ref_diff: diff,
            variants: vec![variant],
            region: region.clone(),
        };
        let out = transform_unit(&unit, &["c1".into()]).unwrap();
        assert_eq!(out.len(), 1);
        let v = &out[0];
        assert_eq!(v.reference_bases.as_str(), "A");
        assert_eq!(v.alternate_bases[0].as_str(), "ACTG");
        assert_eq!(v.calls[0].genotype, vec![1, 0]);
    }

    #[test]
    fn mnv_on_negative_strand_is_unsupported() {
        let region = region_neg();
        let variant = Variant::new(
            "chr2",
            3,
            allele("AT"),
            vec![allele("A")],
            vec![VariantCall::new("s", vec![0, 1])],
        )
        .unwrap();
        let unit = TransformationUnit {
            ref_diff: RefDiff::NoDiff,
            variants: vec![variant],
            region: region.clone(),
        };
        let result = transform_unit(&unit, &["s".into()]);
        assert!(matches!(result, Err(GenomeWarpError::Unsupported(_))));
    }

    #[test]
    fn two_variants_on_one_ref_diff_is_unsupported() {
        let region = region_pos();
        let diff = RefDiff::create(17, allele("A"), allele("G")).unwrap();
        let v1 = Variant::new("chr1", 17, allele("A"), vec![allele("G")], vec![]).unwrap();
        let v2 = Variant::new("chr1", 20, allele("A"), vec![allele("G")], vec![]).unwrap();
        let unit = TransformationUnit {
            ref_diff: diff,
            variants: vec![v1, v2],
            region,
        };
        let result = transform_unit(&unit, &[]);
        assert!(matches!(result, Err(GenomeWarpError::Unsupported(_))));
    }
}
