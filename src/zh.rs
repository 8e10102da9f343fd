//! Chinese spoken-form normalization.
//!
//! Rewrites numerals, dates, clock times, percentages, fractions, ranges
//! and measure units into the characters the synthesizer should read.
//! The stage driver works line by line: input is split on `\n`, blank
//! lines are dropped, each remaining line is normalized, and the lines are
//! re-joined with `\n` — newlines are the downstream chunker's split
//! signal and must survive.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const DIGITS: [&str; 10] = ["零", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

// ─────────────────────────────────────────────────────────────────────────────
// Number → characters
// ─────────────────────────────────────────────────────────────────────────────

/// Read a digit string verbatim, one character per digit (years, phone-like
/// runs). Non-digits are ignored.
pub fn digits_to_zh(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_digit)
        .map(|c| DIGITS[c as usize - '0' as usize])
        .collect()
}

/// One group of up to four digits, 1..=9999.
fn section_to_zh(n: u64) -> String {
    let units = ["千", "百", "十", ""];
    let digits = [n / 1000, n / 100 % 10, n / 10 % 10, n % 10];
    let mut out = String::new();
    let mut started = false;
    let mut pending_zero = false;
    for (&d, unit) in digits.iter().zip(units) {
        if d == 0 {
            if started {
                pending_zero = true;
            }
        } else {
            if pending_zero {
                out.push_str("零");
                pending_zero = false;
            }
            out.push_str(DIGITS[d as usize]);
            out.push_str(unit);
            started = true;
        }
    }
    out
}

fn int_to_zh_inner(n: u64) -> String {
    if n >= 100_000_000 {
        let mut s = int_to_zh_inner(n / 100_000_000);
        s.push_str("亿");
        let low = n % 100_000_000;
        if low > 0 {
            if low < 10_000_000 {
                s.push_str("零");
            }
            s.push_str(&int_to_zh_inner(low));
        }
        s
    } else if n >= 10_000 {
        let mut s = int_to_zh_inner(n / 10_000);
        s.push_str("万");
        let low = n % 10_000;
        if low > 0 {
            if low < 1000 {
                s.push_str("零");
            }
            s.push_str(&int_to_zh_inner(low));
        }
        s
    } else {
        section_to_zh(n)
    }
}

/// Quantity reading of a non-negative integer.
pub fn int_to_zh(n: u64) -> String {
    if n == 0 {
        return "零".to_string();
    }
    let s = int_to_zh_inner(n);
    // 10..19 read 十二, not 一十二.
    if (10..20).contains(&n) {
        s.trim_start_matches('一').to_string()
    } else {
        s
    }
}

/// Signed decimal reading: `-3.5` → `负三点五`. Integer parts too long for
/// a quantity reading fall back to digit-by-digit.
pub fn number_to_zh(raw: &str) -> String {
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(r) => ("负", r),
        None => ("", raw),
    };
    let (int_part, dec_part) = match rest.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (rest, None),
    };
    let int_words = match int_part.parse::<u64>() {
        Ok(n) => int_to_zh(n),
        Err(_) => digits_to_zh(int_part),
    };
    let mut out = format!("{sign}{int_words}");
    if let Some(d) = dec_part {
        out.push_str("点");
        out.push_str(&digits_to_zh(d));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled rules (lazily initialised once)
// ─────────────────────────────────────────────────────────────────────────────

static RE_DATE_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,4})年(\d{1,2})月(\d{1,2})[日号]").unwrap());
static RE_DATE_MD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})月(\d{1,2})[日号]").unwrap());
static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{2,4})年").unwrap());
static RE_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap());
static RE_PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)[%％]").unwrap());
static RE_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)/(\d+)").unwrap());
static RE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)[-~～](\d+(?:\.\d+)?)").unwrap());
static RE_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)(km|kg|mg|ml|mm|cm|kw|℃|[mg]\b)").unwrap());
static RE_LONG_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{10,}").unwrap());
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

fn unit_zh(unit: &str) -> &'static str {
    match unit {
        "km" => "千米",
        "kg" => "千克",
        "mg" => "毫克",
        "ml" => "毫升",
        "mm" => "毫米",
        "cm" => "厘米",
        "kw" => "千瓦",
        "℃" => "摄氏度",
        "m" => "米",
        "g" => "克",
        _ => "",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize a single line to spoken form. Rule order matters: composite
/// patterns (dates, times, fractions) must consume their digits before the
/// generic number rule sees them.
pub fn normalize_line(line: &str) -> String {
    let text = RE_DATE_YMD.replace_all(line, |caps: &Captures| {
        format!(
            "{}年{}月{}日",
            digits_to_zh(&caps[1]),
            int_to_zh(caps[2].parse().unwrap_or(0)),
            int_to_zh(caps[3].parse().unwrap_or(0)),
        )
    });
    let text = RE_DATE_MD.replace_all(&text, |caps: &Captures| {
        format!(
            "{}月{}日",
            int_to_zh(caps[1].parse().unwrap_or(0)),
            int_to_zh(caps[2].parse().unwrap_or(0)),
        )
    });
    let text = RE_YEAR.replace_all(&text, |caps: &Captures| {
        format!("{}年", digits_to_zh(&caps[1]))
    });
    let text = RE_CLOCK.replace_all(&text, |caps: &Captures| {
        let hour = int_to_zh(caps[1].parse().unwrap_or(0));
        let min: u64 = caps[2].parse().unwrap_or(0);
        let mut out = format!("{hour}点");
        if min == 0 {
            out.push_str("整");
        } else {
            if min < 10 {
                out.push_str("零");
            }
            out.push_str(&int_to_zh(min));
            out.push_str("分");
        }
        if let Some(sec) = caps.get(3) {
            let sec: u64 = sec.as_str().parse().unwrap_or(0);
            out.push_str(&int_to_zh(sec));
            out.push_str("秒");
        }
        out
    });
    let text = RE_PERCENT.replace_all(&text, |caps: &Captures| {
        format!("百分之{}", number_to_zh(&caps[1]))
    });
    let text = RE_FRACTION.replace_all(&text, |caps: &Captures| {
        format!(
            "{}分之{}",
            int_to_zh(caps[2].parse().unwrap_or(0)),
            int_to_zh(caps[1].parse().unwrap_or(0)),
        )
    });
    let text = RE_RANGE.replace_all(&text, |caps: &Captures| {
        format!("{}到{}", number_to_zh(&caps[1]), number_to_zh(&caps[2]))
    });
    let text = RE_UNIT.replace_all(&text, |caps: &Captures| {
        format!("{}{}", number_to_zh(&caps[1]), unit_zh(&caps[2]))
    });
    // Phone-like runs are too long for a quantity reading.
    let text = RE_LONG_DIGITS.replace_all(&text, |caps: &Captures| digits_to_zh(&caps[0]));
    RE_NUMBER
        .replace_all(&text, |caps: &Captures| number_to_zh(&caps[0]))
        .into_owned()
}

/// The stage entry point: line-wise normalization that preserves `\n` and
/// drops blank lines.
pub fn normalize_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_zh() {
        assert_eq!(int_to_zh(0), "零");
        assert_eq!(int_to_zh(7), "七");
        assert_eq!(int_to_zh(10), "十");
        assert_eq!(int_to_zh(12), "十二");
        assert_eq!(int_to_zh(20), "二十");
        assert_eq!(int_to_zh(95), "九十五");
        assert_eq!(int_to_zh(110), "一百一十");
        assert_eq!(int_to_zh(1005), "一千零五");
        assert_eq!(int_to_zh(10_005), "一万零五");
        assert_eq!(int_to_zh(100_000_000), "一亿");
        assert_eq!(int_to_zh(120_000_456), "一亿二千万零四百五十六");
    }

    #[test]
    fn test_number_to_zh() {
        assert_eq!(number_to_zh("-3.5"), "负三点五");
        assert_eq!(number_to_zh("0.25"), "零点二五");
        assert_eq!(number_to_zh("42"), "四十二");
    }

    #[test]
    fn test_dates() {
        assert_eq!(normalize_line("2024年5月1日"), "二零二四年五月一日");
        assert_eq!(normalize_line("5月12号"), "五月十二日");
        assert_eq!(normalize_line("1998年"), "一九九八年");
    }

    #[test]
    fn test_clock_times() {
        assert_eq!(normalize_line("12:30"), "十二点三十分");
        assert_eq!(normalize_line("9:05"), "九点零五分");
        assert_eq!(normalize_line("8:00"), "八点整");
        assert_eq!(normalize_line("7:15:30"), "七点十五分三十秒");
    }

    #[test]
    fn test_percent_fraction_range() {
        assert_eq!(normalize_line("95%"), "百分之九十五");
        assert_eq!(normalize_line("95％"), "百分之九十五");
        assert_eq!(normalize_line("3/4"), "四分之三");
        assert_eq!(normalize_line("5-8"), "五到八");
    }

    #[test]
    fn test_units() {
        assert_eq!(normalize_line("10km"), "十千米");
        assert_eq!(normalize_line("1.5kg"), "一点五千克");
        assert_eq!(normalize_line("37℃"), "三十七摄氏度");
        assert_eq!(normalize_line("500m"), "五百米");
    }

    #[test]
    fn test_long_digit_runs_read_verbatim() {
        assert_eq!(
            normalize_line("13812345678"),
            "一三八一二三四五六七八"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize_line("今天天气很好"), "今天天气很好");
    }

    #[test]
    fn test_lines_preserved_blanks_dropped() {
        let out = normalize_lines("第1段\n\n  \n第2段");
        assert_eq!(out, "第一段\n第二段");
    }
}
