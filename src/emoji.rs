//! Emoji → textual description.
//!
//! A synthesizer can't read 🚀; it can read "rocket" (or "火箭"). Each
//! emoji is replaced with its description in the detected language, with
//! no surrounding delimiters. English names come from the `emojis`
//! registry; a built-in table covers Chinese descriptions for the emoji
//! that actually show up in chat text, falling back to the English name.

use crate::lang::Lang;

/// Longest emoji sequence tried, in chars (flag + ZWJ sequences).
const MAX_SEQ_CHARS: usize = 8;

/// Chinese descriptions for common emoji, keyed by the registry's
/// canonical form.
fn zh_description(emoji: &str) -> Option<&'static str> {
    let name = match emoji {
        "😀" => "咧嘴笑",
        "😁" => "开心大笑",
        "😂" => "笑哭了",
        "🤣" => "笑得打滚",
        "😊" => "微笑",
        "😅" => "尴尬的笑",
        "😉" => "眨眼",
        "😍" => "花痴",
        "😘" => "飞吻",
        "😭" => "大哭",
        "😢" => "流泪",
        "😡" => "生气",
        "😱" => "吓死了",
        "🤔" => "想一想",
        "😴" => "睡着了",
        "👍" => "点赞",
        "👎" => "点踩",
        "👏" => "鼓掌",
        "🙏" => "合十",
        "💪" => "加油",
        "❤️" => "红心",
        "💔" => "心碎",
        "🔥" => "火",
        "🎉" => "庆祝",
        "🚀" => "火箭",
        "⭐" => "星星",
        "🌹" => "玫瑰",
        "☀️" => "太阳",
        "🌙" => "月亮",
        "🐶" => "狗",
        "🐱" => "猫",
        _ => return None,
    };
    Some(name)
}

/// Variation selectors, joiners and skin-tone modifiers that ride along
/// with an emoji cluster and must not leak into the output text.
fn is_emoji_plumbing(c: char) -> bool {
    matches!(c as u32, 0xFE0F | 0x200D | 0x1F3FB..=0x1F3FF)
}

fn description(emoji: &emojis::Emoji, lang: Lang) -> String {
    if lang == Lang::Zh {
        if let Some(zh) = zh_description(emoji.as_str()) {
            return zh.to_string();
        }
    }
    emoji.name().to_string()
}

/// Replace every emoji in `text` with its description, no delimiters.
/// Non-emoji text is untouched.
pub fn demojize(text: &str, lang: Lang) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(first) = rest.chars().next() {
        // ASCII never starts an emoji worth converting; skip the lookups.
        if first.is_ascii() {
            out.push(first);
            rest = &rest[first.len_utf8()..];
            continue;
        }
        // Longest match first so ZWJ sequences and flags win over their
        // first code point.
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take(MAX_SEQ_CHARS)
            .collect();
        for &end in ends.iter().rev() {
            if let Some(emoji) = emojis::get(&rest[..end]) {
                out.push_str(&description(emoji, lang));
                rest = &rest[end..];
                // Drop cluster plumbing trailing a converted emoji.
                while let Some(c) = rest.chars().next() {
                    if is_emoji_plumbing(c) {
                        rest = &rest[c.len_utf8()..];
                    } else {
                        break;
                    }
                }
                continue 'outer;
            }
        }
        out.push(first);
        rest = &rest[first.len_utf8()..];
    }
    out
}
