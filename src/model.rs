//! Core value types shared by every component of the transformation engine.
//!
//! Everything here is an immutable value type: construction validates, and
//! nothing in this crate mutates a `Variant`, `HomologousRegion`, or `Allele`
//! once built (§3, "Lifecycles").

use crate::dna;
use crate::error::GenomeWarpError;

/// A zero-based, half-open interval on a named reference sequence.
///
/// Invariant: `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GenomeInterval {
    pub reference_name: String,
    pub start: i64,
    pub end: i64,
}

impl GenomeInterval {
    pub fn new(
        reference_name: impl Into<String>,
        start: i64,
        end: i64,
    ) -> crate::error::Result<Self> {
        if start > end {
            return Err(GenomeWarpError::InvalidInput(format!(
                "interval start {start} must be <= end {end}"
            )));
        }
        Ok(Self {
            reference_name: reference_name.into(),
            start,
            end,
        })
    }

    pub fn length(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains_pos(&self, reference_name: &str, pos: i64) -> bool {
        self.reference_name == reference_name && self.start <= pos && pos < self.end
    }
}

/// Strand orientation of a homologous region relative to the query assembly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Strand {
    Positive,
    Negative,
}

/// Classification of a homologous region, as decided by `RegionClassifier`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum RegionType {
    /// Query and target bases are identical after strand canonicalization.
    Identical,
    /// Query and target have equal length but differ in content.
    MismatchedBases,
    /// Query and target interval lengths differ; alignment would be needed.
    AlignmentRequired,
    /// Filter-out sentinel: the region could not be classified at all.
    Unknown,
}

/// A query interval paired with its lifted target interval, strand, and
/// classification.
///
/// Invariant: when `region_type` is `Identical` or `MismatchedBases`,
/// `query.length() == target.length()`. `AlignmentRequired` means the
/// lengths differ. `Unknown` is produced only by `RegionClassifier` and is a
/// signal to drop the region.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HomologousRegion {
    pub query: GenomeInterval,
    pub target: GenomeInterval,
    pub strand: Strand,
    pub region_type: RegionType,
}

impl HomologousRegion {
    /// Constructs a region, checking the length-equality invariant for
    /// `Identical` / `MismatchedBases` regions.
    pub fn new(
        query: GenomeInterval,
        target: GenomeInterval,
        strand: Strand,
        region_type: RegionType,
    ) -> crate::error::Result<Self> {
        if matches!(region_type, RegionType::Identical | RegionType::MismatchedBases)
            && query.length() != target.length()
        {
            return Err(GenomeWarpError::InvalidInput(format!(
                "region type {region_type} requires equal query/target length, got {} vs {}",
                query.length(),
                target.length()
            )));
        }
        Ok(Self {
            query,
            target,
            strand,
            region_type,
        })
    }
}

/// A validated, non-empty DNA string over `{A,C,G,T,a,c,g,t}`.
///
/// Centralizing the validity check here means call sites that already hold
/// an `Allele` never have to re-check it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Allele(String);

impl Allele {
    pub fn new(bases: impl Into<String>) -> crate::error::Result<Self> {
        let bases = bases.into();
        if !dna::is_dna_only(&bases) {
            return Err(GenomeWarpError::InvalidInput(format!(
                "allele {bases:?} is not a non-empty DNA string"
            )));
        }
        Ok(Self(bases))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_base(&self) -> u8 {
        self.0.as_bytes()[0]
    }

    pub fn to_uppercase(&self) -> String {
        dna::uppercase(&self.0)
    }

    pub fn reverse_complement(&self) -> Self {
        Self(dna::reverse_complement(&self.0))
    }

    /// Case-insensitive equality, used throughout reference-difference
    /// comparison (anchor-base matching, assembly base equality).
    pub fn eq_ignore_case(&self, other: &Allele) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::fmt::Display for Allele {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-sample genotype information on a `Variant`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariantCall {
    pub call_set_name: String,
    /// Allele indices; `-1` denotes a no-call. Indices refer to the owning
    /// variant's allele table (0 = reference, 1..N = alternates).
    pub genotype: Vec<i32>,
    pub phased: bool,
    pub genotype_likelihoods: Option<Vec<f64>>,
}

impl VariantCall {
    pub fn new(call_set_name: impl Into<String>, genotype: Vec<i32>) -> Self {
        Self {
            call_set_name: call_set_name.into(),
            genotype,
            phased: false,
            genotype_likelihoods: None,
        }
    }
}

/// An ordered mapping from an INFO field name to its scalar values.
///
/// `indexmap::IndexMap` preserves insertion order, matching the VCF INFO
/// field's natural iteration order without needing a separate key list.
pub type InfoMap = indexmap::IndexMap<String, Vec<InfoValue>>;

/// A scalar INFO value. The spec leaves the concrete scalar type open;
/// this engine never interprets INFO content, only carries it through, so a
/// small closed set covering VCF's own scalar kinds suffices.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InfoValue {
    Integer(i64),
    Float(f64),
    String(String),
    Flag,
}

/// A single variant call in the VCF sense: a reference allele, an ordered
/// set of alternate alleles, and per-sample genotype calls.
///
/// Invariant: `end == start + referenceBases.len()`. Invariant: every
/// genotype index in every call is either `-1` or in `[0, alternateBases.len()]`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variant {
    pub reference_name: String,
    pub start: i64,
    pub end: i64,
    pub reference_bases: Allele,
    pub alternate_bases: Vec<Allele>,
    pub filters: Vec<String>,
    pub quality: Option<f64>,
    pub info: InfoMap,
    pub names: Vec<String>,
    pub calls: Vec<VariantCall>,
}

impl Variant {
    /// Builds a `Variant`, computing `end` from `start` and the reference
    /// allele length and validating every call's genotype indices.
    pub fn new(
        reference_name: impl Into<String>,
        start: i64,
        reference_bases: Allele,
        alternate_bases: Vec<Allele>,
        calls: Vec<VariantCall>,
    ) -> crate::error::Result<Self> {
        let end = start + reference_bases.len() as i64;
        for call in &calls {
            for &g in &call.genotype {
                if g != -1 && (g < 0 || g as usize > alternate_bases.len()) {
                    return Err(GenomeWarpError::InvalidInput(format!(
                        "genotype index {g} out of range for {} alternates",
                        alternate_bases.len()
                    )));
                }
            }
        }
        Ok(Self {
            reference_name: reference_name.into(),
            start,
            end,
            reference_bases,
            alternate_bases,
            filters: Vec::new(),
            quality: None,
            info: InfoMap::new(),
            names: Vec::new(),
            calls,
        })
    }

    /// `true` iff this variant is a multi-nucleotide variant: `max(|ref|,
    /// max|alt|) > 1`.
    pub fn is_mnv(&self) -> bool {
        let ref_len = self.reference_bases.len();
        let max_alt_len = self.alternate_bases.iter().map(Allele::len).max().unwrap_or(0);
        ref_len.max(max_alt_len) > 1
    }

    /// `true` iff this variant is a plain SNV (`|ref| == 1` and every
    /// alternate has length 1).
    pub fn is_snv(&self) -> bool {
        !self.is_mnv()
    }
}
