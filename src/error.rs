//! Error type definition.

use thiserror::Error;

/// Error taxonomy for the per-region transformation engine.
///
/// `Unsupported` and `Invalid` are not fatal to a run: a caller encountering
/// either one drops the offending region (and its variants) from the output
/// and continues with the next region. `InvalidInput`, `InvalidRefDiff`, and
/// `BadFasta` indicate a problem with the caller or its inputs that is not
/// local to a single region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenomeWarpError {
    /// A precondition supplied by the caller was violated (bad region, a
    /// variant outside its region, unknown strand or region type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `RefDiff::create` rejected its arguments.
    #[error("invalid ref diff: {0}")]
    InvalidRefDiff(String),

    /// A non-ACGT base was encountered where the caller expected DNA.
    #[error("non-DNA base in {reference_name} at position {position}")]
    DnaInvalid {
        reference_name: String,
        position: i64,
    },

    /// The underlying FASTA file is malformed (e.g. DOS line endings).
    #[error("malformed FASTA: {0}")]
    BadFasta(String),

    /// The region's shape or the combination of reference/variant changes it
    /// contains is not yet handled by this engine. Expected and recoverable:
    /// the caller should drop this region and continue.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// An internal consistency check failed inside an otherwise-supported
    /// code path. Not fatal to the run, but worth logging.
    #[error("invalid: {0}")]
    Invalid(&'static str),
}

pub type Result<T> = std::result::Result<T, GenomeWarpError>;
