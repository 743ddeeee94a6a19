//! Engine-wide tunables.
//!
//! Not part of the spec's data model — added so that `IndelCopyNumberDetector`'s
//! repeat-scan window growth (§4.4 step 2) is configurable rather than a
//! buried magic number, following the teacher crate's habit of building its
//! output-shaped structs with `derive_builder::Builder`.
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct EngineConfig {
    /// Initial window size (bases) fetched when scanning a tandem repeat run.
    #[builder(default = "64")]
    pub initial_window: usize,

    /// Upper bound on the repeat-scan window, to bound refetch loops against
    /// a pathological `FastaIndex` implementation. The scan is in any case
    /// clamped at the chromosome end (§4.4 edge case); this bound only
    /// limits how large a single fetch request can get before that clamp
    /// kicks in.
    #[builder(default = "1 << 20")]
    pub max_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfigBuilder::default()
            .build()
            .expect("all fields have defaults")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.initial_window, 64);
        assert!(cfg.max_window > cfg.initial_window);
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = EngineConfigBuilder::default()
            .initial_window(8)
            .build()
            .unwrap();
        assert_eq!(cfg.initial_window, 8);
    }
}
