//! Homophone replacement map.
//!
//! Some words the downstream synthesizer reliably mispronounces —
//! mostly Chinese polyphones where the model picks the wrong reading.
//! The map swaps them for phonetically equivalent spellings the model
//! gets right. Loaded from a JSON object (`{"term": "replacement"}`)
//! once at pipeline construction; a missing or malformed file is a
//! construction error, never a silently empty map.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::error::{Error, Result};

/// Default map shipped with the crate.
const BUILTIN_MAP: &str = include_str!("../resources/homophones_map.json");

/// Read-only term → replacement map, longest terms applied first.
#[derive(Debug, Clone)]
pub struct HomophoneMap {
    // Sorted by key length descending so overlapping entries resolve
    // deterministically (e.g. a two-character term wins over a
    // single-character prefix of it).
    entries: Vec<(String, String)>,
}

impl HomophoneMap {
    /// Load the map from a JSON file. Fails fast on a missing file or
    /// malformed JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))
            .map_err(|reason| Error::HomophoneMap { reason })?;
        Self::from_json(&raw)
    }

    /// The map embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_MAP)
    }

    /// Parse a JSON object of `term: replacement` pairs.
    pub fn from_json(raw: &str) -> Result<Self> {
        let map: HashMap<String, String> = serde_json::from_str(raw)
            .context("parsing homophone map JSON")
            .map_err(|reason| Error::HomophoneMap { reason })?;
        let mut entries: Vec<(String, String)> = map.into_iter().collect();
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()).then(a.0.cmp(&b.0)));
        Ok(Self { entries })
    }

    /// Replace every mapped term in `text`. Unmapped text passes through
    /// unchanged.
    pub fn replace(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (term, replacement) in &self.entries {
            if out.contains(term.as_str()) {
                out = out.replace(term.as_str(), replacement);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
