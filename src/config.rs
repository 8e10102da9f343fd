//! Pipeline configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-stage enable flags for the built-in stage set, plus the homophone
/// map source. All stages default to enabled; `homophone_map: None` uses
/// the embedded default map.
///
/// Serde-derived so it can ride in a larger JSON config file; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TnConfig {
    pub html_unescape: bool,
    pub fix_text: bool,
    pub markdown_to_text: bool,
    pub remove_html_tags: bool,
    pub replace_quotes: bool,
    pub normalize_zh: bool,
    pub normalize_en: bool,
    pub apply_character_map: bool,
    pub apply_emoji_map: bool,
    pub insert_spaces_between_uppercase: bool,
    pub replace_homophones: bool,
    /// Path to a homophone map JSON file (`{"term": "replacement", ...}`).
    /// `None` uses the map embedded in the crate.
    pub homophone_map: Option<PathBuf>,
}

impl Default for TnConfig {
    fn default() -> Self {
        Self {
            html_unescape: true,
            fix_text: true,
            markdown_to_text: true,
            remove_html_tags: true,
            replace_quotes: true,
            normalize_zh: true,
            normalize_en: true,
            apply_character_map: true,
            apply_emoji_map: true,
            insert_spaces_between_uppercase: true,
            replace_homophones: true,
            homophone_map: None,
        }
    }
}
