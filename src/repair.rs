//! Encoding repair — best-effort mojibake fixing plus NFC.
//!
//! The classic failure this targets: UTF-8 bytes decoded as latin-1 or
//! cp1252 somewhere upstream, so `é` arrives as `Ã©` and `’` as `â€™`.
//! The repair re-encodes suspicious text per cp1252 and re-decodes it as
//! UTF-8, accepting the result only when it strictly reduces the amount
//! of suspicious material. Clean text (ASCII, CJK, ordinary accented
//! words) is left alone apart from NFC normalization.

use unicode_normalization::UnicodeNormalization;

/// Re-decode passes attempted on doubly/triply mangled input.
const MAX_PASSES: usize = 3;

/// Repair mojibake where possible and NFC-normalize. Never fails; when no
/// repair applies the input comes back with only NFC applied.
pub fn fix_text(text: &str) -> String {
    let mut cur = text.to_string();
    for _ in 0..MAX_PASSES {
        let score = mojibake_score(&cur);
        if score == 0 {
            break;
        }
        match redecode_as_utf8(&cur) {
            Some(fixed) if mojibake_score(&fixed) < score => cur = fixed,
            _ => break,
        }
    }
    cur.nfc().collect()
}

/// Count characters that look like mis-decoded UTF-8 bytes: the latin-1
/// supplement block plus the cp1252 punctuation specials. Ordinary accented
/// text also scores here, which is fine — the caller only accepts a repair
/// when the score strictly drops, and real accented text round-trips to
/// invalid UTF-8 and is rejected.
fn mojibake_score(text: &str) -> usize {
    text.chars()
        .filter(|&c| cp1252_byte(c).is_some_and(|b| b >= 0x80))
        .count()
}

/// Map every char back to the cp1252/latin-1 byte it was decoded from,
/// then reinterpret the byte string as UTF-8. `None` when any char has no
/// byte equivalent or the bytes are not valid UTF-8.
fn redecode_as_utf8(text: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        bytes.push(cp1252_byte(c)?);
    }
    String::from_utf8(bytes).ok()
}

fn cp1252_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if code <= 0xFF {
        // Latin-1 range, including the C1 controls a lenient latin-1
        // decoder produces for bytes 0x80-0x9F.
        return Some(code as u8);
    }
    // cp1252 remaps most of 0x80-0x9F to punctuation and letters.
    let b = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixes_latin1_mojibake() {
        assert_eq!(fix_text("Ã©tÃ©"), "été");
        assert_eq!(fix_text("naÃ¯ve cafÃ©"), "naïve café");
    }

    #[test]
    fn test_fixes_cp1252_mojibake() {
        // â€™ is U+2019 seen through cp1252.
        assert_eq!(fix_text("donâ€™t"), "don\u{2019}t");
        assert_eq!(fix_text("â€œquotedâ€\u{9d}"), "\u{201C}quoted\u{201D}");
    }

    #[test]
    fn test_fixes_double_mojibake() {
        // "é" mangled twice: é → Ã© → ÃƒÂ©.
        assert_eq!(fix_text("ÃƒÂ©"), "é");
    }

    #[test]
    fn test_clean_text_untouched() {
        assert_eq!(fix_text("hello world"), "hello world");
        assert_eq!(fix_text("你好，世界。"), "你好，世界。");
        // Genuine accented text round-trips to invalid UTF-8 → no repair.
        assert_eq!(fix_text("café déjà vu"), "café déjà vu");
    }

    #[test]
    fn test_applies_nfc() {
        // e + combining acute → precomposed é.
        assert_eq!(fix_text("cafe\u{301}"), "café");
    }
}
