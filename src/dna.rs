//! DNA alphabet validation and reverse-complementation.
//!
//! Built on `bio::alphabets::dna`, which already ships the complement table
//! this crate would otherwise have to hand-roll.

use bio::alphabets::dna as bio_dna;

/// Returns `true` iff every byte in `seq` is one of `ACGTacgt`.
///
/// This is stricter than `bio`'s own `dna::alphabet()`, which also accepts
/// `N`; the spec treats any non-ACGT base (including `N`) as disqualifying
/// (§4.2 step 3, §4.3).
pub fn is_dna_only(seq: &str) -> bool {
    !seq.is_empty()
        && seq
            .bytes()
            .all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't'))
}

/// Uppercases a DNA string. `FastaIndex::get` is documented to already return
/// uppercased bases (§6), but variant alleles arrive from the caller in
/// whatever case it used, so callers normalize at the comparison boundary.
pub fn uppercase(seq: &str) -> String {
    seq.to_ascii_uppercase()
}

/// Reverse-complements a DNA string, preserving case.
///
/// Delegates to `bio::alphabets::dna::revcomp`, which implements the
/// standard IUPAC complement table over bytes.
pub fn reverse_complement(seq: &str) -> String {
    let complemented = bio_dna::revcomp(seq.as_bytes());
    // SAFETY-free: revcomp only ever permutes+complements ASCII input bytes
    // drawn from an ASCII string, so the result stays valid UTF-8.
    String::from_utf8(complemented).expect("reverse complement of ASCII input is valid UTF-8")
}
