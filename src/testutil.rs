//! In-memory `FastaIndex` test double.
//!
//! Grounded in the teacher crate's habit of building minimal in-memory
//! fixtures for its own schema/interpreter tests rather than reading real
//! files (e.g. `strucvars::query::interpreter`'s hand-built `StructuralVariant`
//! literals) — no test in this crate touches the filesystem.

use crate::error::Result;
use crate::traits::{FastaIndex, MISSING_CHROMOSOME_SENTINEL};

#[derive(Debug, Clone, Default)]
pub struct InMemoryFasta {
    sequences: indexmap::IndexMap<String, String>,
}

impl InMemoryFasta {
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut sequences = indexmap::IndexMap::new();
        for (name, seq) in entries {
            sequences.insert(name.to_string(), seq.to_ascii_uppercase());
        }
        Self { sequences }
    }
}

impl FastaIndex for InMemoryFasta {
    fn get(&self, reference_name: &str, start: i64, end: i64) -> Result<String> {
        let Some(seq) = self.sequences.get(reference_name) else {
            return Ok(MISSING_CHROMOSOME_SENTINEL.to_string());
        };
        let len = seq.len() as i64;
        let start = if start < 0 { 0 } else { start };
        let end = if end < 0 { len } else { end.min(len) };
        if start >= end {
            return Ok(String::new());
        }
        Ok(seq[start as usize..end as usize].to_string())
    }

    fn chromosome_size(&self, reference_name: &str) -> i64 {
        self.sequences
            .get(reference_name)
            .map(|s| s.len() as i64)
            .unwrap_or(-1)
    }

    fn reference_order(&self) -> indexmap::IndexMap<String, i64> {
        self.sequences
            .iter()
            .map(|(name, seq)| (name.clone(), seq.len() as i64))
            .collect()
    }
}
