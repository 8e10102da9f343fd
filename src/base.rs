//! Built-in stage set and the [`base_pipeline`] constructor.
//!
//! Stage order is load-bearing: later stages assume earlier cleanup
//! already happened (quote unwrapping runs on entity-decoded text, the
//! character map runs after script normalization has consumed `/` and `-`
//! in fractions and ranges, and so on). `base_pipeline` registers the
//! stages in that fixed order; per-stage enable flags come from
//! [`TnConfig`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::config::TnConfig;
use crate::error::Result;
use crate::homophone::HomophoneMap;
use crate::lang::Lang;
use crate::pipeline::Pipeline;
use crate::{emoji, en, markdown, repair, zh};

// ─────────────────────────────────────────────────────────────────────────────
// Individual stages
// ─────────────────────────────────────────────────────────────────────────────

/// Decode HTML entities, twice: double-escaped input (`&amp;amp;`) shows
/// up in scraped text, and decoding is idempotent on clean text.
pub fn html_unescape(text: &str) -> String {
    let once = html_escape::decode_html_entities(text);
    html_escape::decode_html_entities(once.as_ref()).into_owned()
}

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Strip remaining HTML tags. Replaced by a space, not removed, so
/// `a<br>b` does not fuse into one word.
pub fn remove_html_tags(text: &str) -> String {
    RE_TAG.replace_all(text, " ").into_owned()
}

/// The quote pairs whose spans get promoted to their own lines.
const QUOTE_PAIRS: [(&str, &str); 4] = [
    ("\"", "\""),
    ("'", "'"),
    ("\u{201C}", "\u{201D}"),
    ("\u{2018}", "\u{2019}"),
];

/// Compile one minimal-span pattern per quote pair. A pattern that fails
/// to compile is skipped for that pair only — the rest still apply.
pub fn compile_quote_patterns() -> Vec<Regex> {
    let mut patterns = Vec::new();
    for (start, end) in QUOTE_PAIRS {
        let s = regex::escape(start);
        let e = regex::escape(end);
        // Minimal non-nested span: no quote characters of this pair inside.
        let pattern = format!("{s}([^{s}{e}]*?){e}");
        match Regex::new(&pattern) {
            Ok(re) => patterns.push(re),
            Err(error) => {
                warn!(pattern = %pattern, %error, "skipping malformed quote pattern");
            }
        }
    }
    patterns
}

/// Replace quote delimiters with newlines, promoting each quoted span to
/// its own line (a downstream chunking hint).
pub fn replace_quotes(text: &str, patterns: &[Regex]) -> String {
    let mut out = text.to_string();
    for re in patterns {
        out = re.replace_all(&out, "\n$1\n").into_owned();
    }
    out
}

/// Single-character folds. Full-width and half-width variants map to the
/// matching-width comma/period; connector punctuation maps to a space.
/// No character maps to anything this table also maps, so the fold is
/// idempotent.
fn fold_char(c: char) -> Option<&'static str> {
    Some(match c {
        '：' | '；' => "，",
        '！' => "。",
        '（' | '）' | '【' | '】' | '『' | '』' | '「' | '」' | '《' | '》' | '－' => "，",
        ':' | ';' => ",",
        '!' => ".",
        '(' | ')' | '[' | ']' | '<' | '>' | '-' => ",",
        '~' | '～' | '/' | '·' => " ",
        _ => return None,
    })
}

/// Quote-like glyphs folded to a space after the single-char pass. Both
/// straight and curly variants are listed even where `replace_quotes` has
/// already consumed them — the fold is idempotent, redundancy is harmless.
const QUOTE_GLYPHS: [&str; 6] = ["\u{201C}", "\u{201D}", "\u{2018}", "\u{2019}", "\"", "'"];

pub fn apply_character_map(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_char(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    for glyph in QUOTE_GLYPHS {
        if out.contains(glyph) {
            out = out.replace(glyph, " ");
        }
    }
    out
}

static RE_UPPER_BOUNDARY: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(
        r"(?<=[A-Z])(?=[A-Z])|(?<=[a-z])(?=[A-Z])|(?<=[\u{4e00}-\u{9fa5}])(?=[A-Z])|(?<=[A-Z])(?=[\u{4e00}-\u{9fa5}])",
    )
    .unwrap()
});

/// Space out uppercase runs so acronyms are read letter by letter, and
/// separate Latin acronyms from adjacent CJK text. Boundaries:
/// upper↔upper, lower→upper, CJK→upper, upper→CJK.
pub fn insert_spaces_between_uppercase(text: &str) -> String {
    RE_UPPER_BOUNDARY.replace_all(text, " ").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Build the built-in pipeline. Loads the homophone map up front (an
/// explicit `homophone_map` path that is missing or malformed fails here,
/// never at first run) and registers the ten stages in fixed order.
pub fn base_pipeline(config: &TnConfig) -> Result<Pipeline> {
    let homophones = match &config.homophone_map {
        Some(path) => HomophoneMap::from_path(path)?,
        None => HomophoneMap::builtin()?,
    };
    let quote_patterns = compile_quote_patterns();

    let mut pipeline = Pipeline::new();
    pipeline.register("html_unescape", config.html_unescape, |text, _| {
        Ok(html_unescape(&text))
    });
    pipeline.register("fix_text", config.fix_text, |text, _| {
        Ok(repair::fix_text(&text))
    });
    pipeline.register("markdown_to_text", config.markdown_to_text, |text, _| {
        Ok(markdown::flatten_if_markdown(&text))
    });
    pipeline.register("remove_html_tags", config.remove_html_tags, |text, _| {
        Ok(remove_html_tags(&text))
    });
    pipeline.register("replace_quotes", config.replace_quotes, move |text, _| {
        Ok(replace_quotes(&text, &quote_patterns))
    });
    pipeline.register("normalize_zh", config.normalize_zh, |text, guess| {
        if guess.lang != Lang::Zh {
            return Ok(text);
        }
        Ok(zh::normalize_lines(&text))
    });
    pipeline.register("normalize_en", config.normalize_en, |text, guess| {
        if guess.lang != Lang::En {
            return Ok(text);
        }
        Ok(en::normalize_or_passthrough(text))
    });
    pipeline.register(
        "apply_character_map",
        config.apply_character_map,
        |text, _| Ok(apply_character_map(&text)),
    );
    pipeline.register("apply_emoji_map", config.apply_emoji_map, |text, guess| {
        Ok(emoji::demojize(&text, guess.lang))
    });
    pipeline.register(
        "insert_spaces_between_uppercase",
        config.insert_spaces_between_uppercase,
        |text, _| Ok(insert_spaces_between_uppercase(&text)),
    );
    pipeline.register(
        "replace_homophones",
        config.replace_homophones,
        move |text, guess| {
            if guess.lang != Lang::Zh {
                return Ok(text);
            }
            Ok(homophones.replace(&text))
        },
    );
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    // ── Individual stages ───────────────────────────────────────────────────

    #[test]
    fn test_html_unescape_handles_double_escaping() {
        assert_eq!(html_unescape("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_unescape("Tom &amp;amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_unescape("no entities"), "no entities");
    }

    #[test]
    fn test_remove_html_tags_leaves_a_space() {
        assert_eq!(remove_html_tags("a<br>b"), "a b");
        assert_eq!(remove_html_tags("<p>hi</p>"), " hi ");
        // A lone < is not a tag.
        assert_eq!(remove_html_tags("3 < 4"), "3 < 4");
    }

    #[test]
    fn test_replace_quotes_promotes_span_to_own_line() {
        let patterns = compile_quote_patterns();
        assert_eq!(patterns.len(), 4);
        let out = replace_quotes("He said \"hello world\" today", &patterns);
        assert_eq!(out, "He said \nhello world\n today");
    }

    #[test]
    fn test_replace_quotes_curly_and_unbalanced() {
        let patterns = compile_quote_patterns();
        let out = replace_quotes("她说\u{201C}你好\u{201D}。", &patterns);
        assert_eq!(out, "她说\n你好\n。");
        // Unbalanced quotes match nothing; text passes through.
        let out = replace_quotes("a \" b", &patterns);
        assert_eq!(out, "a \" b");
    }

    #[test]
    fn test_character_map() {
        assert_eq!(apply_character_map("A：B；C！"), "A，B，C。");
        assert_eq!(apply_character_map("(a) [b]"), ",a, ,b,");
        assert_eq!(apply_character_map("路径/文件~"), "路径 文件 ");
        assert_eq!(apply_character_map("“引号”"), " 引号 ");
    }

    #[test]
    fn test_character_map_is_idempotent() {
        let inputs = ["A：B；C！", "x-y/z~", "《书名》【注】", "plain text."];
        for input in inputs {
            let once = apply_character_map(input);
            assert_eq!(apply_character_map(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_uppercase_spacing() {
        assert_eq!(insert_spaces_between_uppercase("ABCHello"), "A B C Hello");
        assert_eq!(insert_spaces_between_uppercase("aB"), "a B");
        assert_eq!(insert_spaces_between_uppercase("微软AI"), "微软 A I");
        assert_eq!(insert_spaces_between_uppercase("AI时代"), "A I 时代");
        assert_eq!(insert_spaces_between_uppercase("hello world"), "hello world");
    }

    // ── Wiring ──────────────────────────────────────────────────────────────

    #[test]
    fn test_stage_order_is_fixed() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        assert_eq!(
            p.stage_names(),
            vec![
                "html_unescape",
                "fix_text",
                "markdown_to_text",
                "remove_html_tags",
                "replace_quotes",
                "normalize_zh",
                "normalize_en",
                "apply_character_map",
                "apply_emoji_map",
                "insert_spaces_between_uppercase",
                "replace_homophones",
            ]
        );
    }

    #[test]
    fn test_disabled_stage_registered_but_skipped() {
        let config = TnConfig {
            insert_spaces_between_uppercase: false,
            ..TnConfig::default()
        };
        let p = base_pipeline(&config).unwrap();
        assert_eq!(p.is_enabled("insert_spaces_between_uppercase"), Some(false));
        // The disabled transformation is absent; the rest still apply.
        assert_eq!(p.run("ABCHello！").unwrap(), "ABCHello。");

        let p = base_pipeline(&TnConfig::default()).unwrap();
        assert_eq!(p.run("ABCHello！").unwrap(), "A B C Hello。");
    }

    #[test]
    fn test_zh_gated_stages_skip_english_input() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        // 重庆 is in the builtin homophone map, but the guess here is En.
        let out = p.run("The Chongqing office opened at noon").unwrap();
        assert_eq!(out, "The Chongqing office opened at noon");
    }

    #[test]
    fn test_end_to_end_chinese() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        assert_eq!(p.run("这是：一个【测试】！").unwrap(), "这是，一个，测试，。");

        let out = p.run("价格上涨了20%！").unwrap();
        assert_eq!(out, "价格上涨了百分之二十。");
    }

    #[test]
    fn test_end_to_end_homophones_applied() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        let out = p.run("重庆的会计今天开会。").unwrap();
        assert_eq!(out, "虫庆的快计今天开会。");
    }

    #[test]
    fn test_newlines_survive_the_pipeline() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        let out = p.run("第1行\n第2行").unwrap();
        assert_eq!(out, "第一行\n第二行");
    }

    #[test]
    fn test_malformed_markup_never_errors() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        for input in [
            "<div><p>broken &amp; <<<",
            "```\nunclosed fence **[",
            "quote \" never closes",
            "&#xZZ; bad entity",
        ] {
            assert!(p.run(input).is_ok(), "errored on: {}", input);
        }
    }

    #[test]
    fn test_emoji_description_follows_guess() {
        let p = base_pipeline(&TnConfig::default()).unwrap();
        assert_eq!(p.run("今天很开心🚀").unwrap(), "今天很开心火箭");
        let out = p.run("we have liftoff 🚀").unwrap();
        assert_eq!(out, "we have liftoff rocket");
    }

    #[test]
    fn test_bad_homophone_path_fails_at_construction() {
        let config = TnConfig {
            homophone_map: Some("/no/such/file.json".into()),
            ..TnConfig::default()
        };
        let err = base_pipeline(&config).unwrap_err();
        assert!(matches!(err, Error::HomophoneMap { .. }));
    }

    #[test]
    fn test_custom_homophone_map_file() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(r#"{"测试": "策试"}"#.as_bytes()).unwrap();
        let config = TnConfig {
            homophone_map: Some(f.path().to_path_buf()),
            ..TnConfig::default()
        };
        let p = base_pipeline(&config).unwrap();
        assert_eq!(p.run("这是一个测试").unwrap(), "这是一个策试");
    }
}
