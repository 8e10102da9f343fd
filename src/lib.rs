//! # tts-tn
//!
//! Text normalization (TN) pipeline for text-to-speech front-ends.
//!
//! Raw input text — with HTML entities, markdown, emoji, full-width
//! punctuation, numerals — is rewritten into a form the synthesizer can
//! read aloud. The pipeline is an ordered list of named stages, each a pure
//! function `(text, language guess) -> text`, gated where appropriate by a
//! cheap classification of the input's dominant script.
//!
//! ## Quick start
//!
//! ```
//! use tts_tn::{base_pipeline, TnConfig};
//!
//! let tn = base_pipeline(&TnConfig::default()).unwrap();
//! let out = tn.run("这是：一个【测试】！").unwrap();
//! assert_eq!(out, "这是，一个，测试，。");
//! ```
//!
//! ## Stage order
//! 1. **html_unescape** — decode HTML entities (twice: double-escaped input
//!    shows up in the wild).
//! 2. **fix_text** — best-effort mojibake repair + NFC.
//! 3. **markdown_to_text** — flatten markdown to plain text if it looks
//!    like markdown.
//! 4. **remove_html_tags** — strip leftover `<...>` tags.
//! 5. **replace_quotes** — promote quoted spans to their own lines.
//! 6. **normalize_zh** / **normalize_en** — script-specific spoken-form
//!    normalization, gated by the language guess.
//! 7. **apply_character_map** — fold punctuation variants to `，`/`。`/space.
//! 8. **apply_emoji_map** — emoji → textual description.
//! 9. **insert_spaces_between_uppercase** — keep acronyms readable.
//! 10. **replace_homophones** — swap words the synthesizer mispronounces
//!     (Chinese only, map loaded from JSON).
//!
//! Newlines survive every stage: the downstream chunker treats them as
//! split points.
//!
//! Every stage can be disabled through [`TnConfig`]; custom stages can be
//! added with [`Pipeline::register`]. One [`Pipeline`] may serve concurrent
//! callers — all stage state is read-only after construction.

pub mod base;
pub mod config;
pub mod emoji;
pub mod en;
pub mod error;
pub mod homophone;
pub mod lang;
pub mod markdown;
pub mod pipeline;
pub mod repair;
pub mod zh;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use base::base_pipeline;
pub use config::TnConfig;
pub use error::{Error, Result};
pub use homophone::HomophoneMap;
pub use lang::{Lang, LanguageGuess};
pub use pipeline::Pipeline;
