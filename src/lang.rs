//! Language guessing for stage gating.
//!
//! This is a character-class census, not real language identification:
//! CJK ideographs vs ASCII letters, majority wins. It only has to be good
//! enough to route text to the right normalization stages.

/// Dominant script of an input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// Chinese-dominant input.
    Zh,
    /// English-dominant input.
    En,
    /// Empty input, an exact tie, or mostly symbols.
    Other,
}

/// Result of classifying one input. Computed once per pipeline run and
/// shared read-only with every stage.
#[derive(Debug, Clone)]
pub struct LanguageGuess {
    pub lang: Lang,
    /// CJK ideographs counted by the heuristic.
    pub cjk: usize,
    /// ASCII letters counted by the heuristic.
    pub latin: usize,
}

impl LanguageGuess {
    /// Classify `text` by counting CJK ideographs and ASCII letters.
    ///
    /// More CJK than Latin gives [`Lang::Zh`], more Latin than CJK gives
    /// [`Lang::En`], and everything else (empty input included) gives
    /// [`Lang::Other`].
    pub fn of(text: &str) -> Self {
        let mut cjk = 0usize;
        let mut latin = 0usize;
        for ch in text.chars() {
            if is_cjk(ch) {
                cjk += 1;
            } else if ch.is_ascii_alphabetic() {
                latin += 1;
            }
        }
        let lang = if cjk > latin {
            Lang::Zh
        } else if latin > cjk {
            Lang::En
        } else {
            Lang::Other
        };
        Self { lang, cjk, latin }
    }

    pub fn is_zh(&self) -> bool {
        self.lang == Lang::Zh
    }

    pub fn is_en(&self) -> bool {
        self.lang == Lang::En
    }
}

fn is_cjk(ch: char) -> bool {
    let code = ch as u32;
    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
        // CJK Unified Ideographs Extension A
        || (0x3400..=0x4DBF).contains(&code)
        // CJK Unified Ideographs Extension B-F
        || (0x20000..=0x2CEAF).contains(&code)
        // CJK Compatibility Ideographs
        || (0xF900..=0xFAFF).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_dominant() {
        let guess = LanguageGuess::of("今天天气很好");
        assert_eq!(guess.lang, Lang::Zh);
        assert!(guess.is_zh());
        assert_eq!(guess.cjk, 6);
        assert_eq!(guess.latin, 0);
    }

    #[test]
    fn test_english_dominant() {
        let guess = LanguageGuess::of("The weather is nice");
        assert_eq!(guess.lang, Lang::En);
        assert!(guess.is_en());
    }

    #[test]
    fn test_mixed_input_majority_wins() {
        // 5 ideographs vs 4 letters
        assert_eq!(LanguageGuess::of("我们在学习Rust").lang, Lang::Zh);
        // 3 ideographs vs 5 letters
        assert_eq!(LanguageGuess::of("你好hello啊").lang, Lang::En);
    }

    #[test]
    fn test_empty_and_tie_are_other() {
        assert_eq!(LanguageGuess::of("").lang, Lang::Other);
        assert_eq!(LanguageGuess::of("好a").lang, Lang::Other);
        assert_eq!(LanguageGuess::of("123 !!!").lang, Lang::Other);
    }

    #[test]
    fn test_punctuation_and_digits_not_counted() {
        let guess = LanguageGuess::of("你好，世界。");
        assert_eq!(guess.cjk, 4);
        assert_eq!(guess.latin, 0);
    }
}
