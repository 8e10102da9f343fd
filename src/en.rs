//! English spoken-form normalization backend.
//!
//! Expands numbers, ordinals, percentages, currency, clock times, measure
//! units, scale suffixes (7B → seven billion) and title abbreviations into
//! words.
//!
//! The original system's English backend is a linguistic toolkit that
//! cannot be installed on Windows or macOS, so on those platforms the
//! stage compiles to a pass-through. Everywhere else the backend is built
//! once and cached; if construction fails the stage logs a single warning
//! and passes text through — that degradation is deliberate and scoped to
//! backend failure only.

use anyhow::Context;
use fancy_regex::{Captures, Regex};

// ─────────────────────────────────────────────────────────────────────────────
// Number → words
// ─────────────────────────────────────────────────────────────────────────────

const SMALL: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const SCALES: [&str; 5] = ["", "thousand", "million", "billion", "trillion"];

fn three_digit_words(n: u64) -> String {
    let mut parts = Vec::new();
    if n >= 100 {
        parts.push(format!("{} hundred", SMALL[(n / 100) as usize]));
    }
    let rem = n % 100;
    if rem > 0 {
        if rem < 20 {
            parts.push(SMALL[rem as usize].to_string());
        } else if rem % 10 == 0 {
            parts.push(TENS[(rem / 10) as usize].to_string());
        } else {
            parts.push(format!("{}-{}", TENS[(rem / 10) as usize], SMALL[(rem % 10) as usize]));
        }
    }
    parts.join(" ")
}

/// Integer quantity reading: `1200` → "twelve hundred", `-42` →
/// "negative forty-two".
pub fn number_to_words(n: i64) -> String {
    if n < 0 {
        return format!("negative {}", number_to_words(-n));
    }
    if n == 0 {
        return "zero".to_string();
    }
    let mut n = n as u64;
    // Even hundreds below ten thousand read as "N hundred" (1200 →
    // "twelve hundred"), except whole thousands.
    if (100..2_000).contains(&n) && n % 100 == 0 && n % 1000 != 0 {
        return format!("{} hundred", SMALL[(n / 100) as usize]);
    }
    let mut groups = Vec::new();
    let mut scale = 0;
    while n > 0 {
        let chunk = n % 1000;
        if chunk > 0 {
            let words = three_digit_words(chunk);
            groups.push(if SCALES[scale].is_empty() {
                words
            } else {
                format!("{} {}", words, SCALES[scale])
            });
        }
        n /= 1000;
        scale += 1;
    }
    groups.reverse();
    groups.join(" ")
}

fn digit_word(c: char) -> &'static str {
    match c {
        '0'..='9' => SMALL[c as usize - '0' as usize],
        _ => "",
    }
}

/// Decimal reading: integer part as a quantity, decimal digits one by one.
pub fn float_to_words(raw: &str) -> String {
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(r) => ("negative ", r),
        None => ("", raw),
    };
    let words = match rest.split_once('.') {
        Some((int_part, dec_part)) => {
            let int_words = if int_part.is_empty() {
                "zero".to_string()
            } else {
                number_to_words(int_part.parse().unwrap_or(0))
            };
            let dec_words: Vec<&str> = dec_part.chars().map(digit_word).collect();
            format!("{} point {}", int_words, dec_words.join(" "))
        }
        None => number_to_words(rest.parse().unwrap_or(0)),
    };
    format!("{sign}{words}")
}

fn numeric_words(raw: &str) -> String {
    if raw.contains('.') {
        float_to_words(raw)
    } else {
        number_to_words(raw.parse().unwrap_or(0))
    }
}

/// Ordinal reading of an integer: `21` → "twenty-first".
pub fn ordinal_words(n: i64) -> String {
    const IRREGULAR: [(&str, &str); 10] = [
        ("one", "first"),
        ("two", "second"),
        ("three", "third"),
        ("four", "fourth"),
        ("five", "fifth"),
        ("six", "sixth"),
        ("seven", "seventh"),
        ("eight", "eighth"),
        ("nine", "ninth"),
        ("twelve", "twelfth"),
    ];
    let cardinal = number_to_words(n);
    // Only the last word changes: "twenty-one" → "twenty-first".
    let (prefix, last, sep) = if let Some(pos) = cardinal.rfind('-') {
        (&cardinal[..pos], &cardinal[pos + 1..], "-")
    } else if let Some(pos) = cardinal.rfind(' ') {
        (&cardinal[..pos], &cardinal[pos + 1..], " ")
    } else {
        ("", cardinal.as_str(), "")
    };
    let last_ordinal = IRREGULAR
        .iter()
        .find(|(base, _)| *base == last)
        .map(|(_, ord)| (*ord).to_string())
        .unwrap_or_else(|| {
            if let Some(stem) = last.strip_suffix('y') {
                format!("{}ieth", stem)
            } else {
                format!("{}th", last)
            }
        });
    if prefix.is_empty() {
        last_ordinal
    } else {
        format!("{prefix}{sep}{last_ordinal}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The backend
// ─────────────────────────────────────────────────────────────────────────────

fn currency_name(symbol: &str) -> &'static str {
    match symbol {
        "$" => "dollar",
        "€" => "euro",
        "£" => "pound",
        "¥" => "yen",
        _ => "",
    }
}

fn scale_word(suffix: &str) -> &'static str {
    match suffix {
        "K" => "thousand",
        "M" => "million",
        "B" => "billion",
        "T" => "trillion",
        _ => "",
    }
}

fn title_expansion(title: &str) -> &'static str {
    match title {
        "Mr" => "Mister",
        "Mrs" => "Missus",
        "Ms" => "Miss",
        "Dr" => "Doctor",
        "Prof" => "Professor",
        "St" => "Saint",
        "Jr" => "Junior",
        "Sr" => "Senior",
        _ => "",
    }
}

fn unit_expansion(unit: &str) -> &'static str {
    match unit.to_lowercase().as_str() {
        "km" => "kilometers",
        "kg" => "kilograms",
        "mg" => "milligrams",
        "ml" => "milliliters",
        "gb" => "gigabytes",
        "mb" => "megabytes",
        "kb" => "kilobytes",
        "tb" => "terabytes",
        "ghz" => "gigahertz",
        "mhz" => "megahertz",
        "khz" => "kilohertz",
        "hz" => "hertz",
        "mph" => "miles per hour",
        "ms" => "milliseconds",
        "°c" => "degrees Celsius",
        "°f" => "degrees Fahrenheit",
        _ => "",
    }
}

/// Compiled rule set. Built once per process (see [`normalize_or_passthrough`]);
/// construction is the only fallible step.
pub struct EnNormalizer {
    re_title: Regex,
    re_currency: Regex,
    re_percent: Regex,
    re_time: Regex,
    re_ordinal: Regex,
    re_unit: Regex,
    re_scale: Regex,
    re_number: Regex,
}

impl EnNormalizer {
    pub fn new() -> anyhow::Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("compiling `{pattern}`"))
        };
        Ok(Self {
            re_title: compile(r"\b(Mrs|Ms|Mr|Dr|Prof|St|Jr|Sr)\.")?,
            re_currency: compile(r"([$€£¥])\s*([\d,]+(?:\.\d+)?)\s*([KMBT])?(?![a-zA-Z\d])")?,
            re_percent: compile(r"(-?[\d,]+(?:\.\d+)?)\s*%")?,
            re_time: compile(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)?\b")?,
            re_ordinal: compile(r"(?i)\b(\d+)(st|nd|rd|th)\b")?,
            re_unit: compile(
                r"(?i)(\d+(?:\.\d+)?)\s*(km|kg|mg|ml|gb|mb|kb|tb|ghz|mhz|khz|hz|mph|ms|°[cf])\b",
            )?,
            re_scale: compile(r"(?<![a-zA-Z])(\d+(?:\.\d+)?)\s*([KMBT])(?![a-zA-Z\d])")?,
            re_number: compile(r"(?<![a-zA-Z])-?[\d,]+(?:\.\d+)?")?,
        })
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = self
            .re_title
            .replace_all(text, |caps: &Captures| title_expansion(&caps[1]).to_string());
        let text = self.re_currency.replace_all(&text, |caps: &Captures| {
            self.expand_currency(caps)
        });
        let text = self.re_percent.replace_all(&text, |caps: &Captures| {
            format!("{} percent", numeric_words(&caps[1].replace(',', "")))
        });
        let text = self.re_time.replace_all(&text, |caps: &Captures| {
            let hour: i64 = caps[1].parse().unwrap_or(0);
            let min: i64 = caps[2].parse().unwrap_or(0);
            let suffix = caps
                .get(3)
                .map(|m| format!(" {}", m.as_str().to_lowercase()))
                .unwrap_or_default();
            let hour_words = number_to_words(hour);
            if min == 0 {
                if suffix.is_empty() {
                    format!("{hour_words} hundred")
                } else {
                    format!("{hour_words}{suffix}")
                }
            } else if min < 10 {
                format!("{hour_words} oh {}{suffix}", number_to_words(min))
            } else {
                format!("{hour_words} {}{suffix}", number_to_words(min))
            }
        });
        let text = self.re_ordinal.replace_all(&text, |caps: &Captures| {
            ordinal_words(caps[1].parse().unwrap_or(0))
        });
        let text = self.re_unit.replace_all(&text, |caps: &Captures| {
            let unit = unit_expansion(&caps[2]);
            let unit = if unit.is_empty() { &caps[2] } else { unit };
            format!("{} {}", numeric_words(&caps[1]), unit)
        });
        let text = self.re_scale.replace_all(&text, |caps: &Captures| {
            format!("{} {}", numeric_words(&caps[1]), scale_word(&caps[2]))
        });
        self.re_number
            .replace_all(&text, |caps: &Captures| {
                let raw = caps[0].replace(',', "");
                if raw.contains('.') {
                    float_to_words(&raw)
                } else if let Ok(n) = raw.parse::<i64>() {
                    number_to_words(n)
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    fn expand_currency(&self, caps: &Captures) -> String {
        let unit = currency_name(&caps[1]);
        let raw = caps[2].replace(',', "");
        if let Some(suffix) = caps.get(3) {
            return format!(
                "{} {} {}s",
                numeric_words(&raw),
                scale_word(suffix.as_str()),
                unit
            );
        }
        match raw.split_once('.') {
            Some((int_part, dec_part)) => {
                let amount: i64 = int_part.parse().unwrap_or(0);
                // Cents are the first two decimal digits, zero-padded.
                let cents: i64 = dec_part
                    .chars()
                    .chain(std::iter::repeat('0'))
                    .take(2)
                    .collect::<String>()
                    .parse()
                    .unwrap_or(0);
                let mut out = format!("{} {}s", number_to_words(amount), unit);
                if cents > 0 {
                    let plural = if cents == 1 { "" } else { "s" };
                    out.push_str(&format!(" and {} cent{}", number_to_words(cents), plural));
                }
                out
            }
            None => {
                let amount: i64 = raw.parse().unwrap_or(0);
                let plural = if amount == 1 { "" } else { "s" };
                format!("{} {}{}", number_to_words(amount), unit, plural)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage entry point — platform gate and graceful degradation
// ─────────────────────────────────────────────────────────────────────────────

/// English normalization is unavailable on Windows and macOS; the stage is
/// a no-op there.
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub fn normalize_or_passthrough(text: String) -> String {
    text
}

/// Normalize English text, or pass it through unchanged when the backend
/// cannot be built. Backend failure is the only swallowed error; it is
/// logged once.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn normalize_or_passthrough(text: String) -> String {
    use std::sync::atomic::{AtomicBool, Ordering};
    static WARNED: AtomicBool = AtomicBool::new(false);

    match backend() {
        Ok(backend) => backend.normalize(&text),
        Err(err) => {
            if !WARNED.swap(true, Ordering::Relaxed) {
                tracing::warn!(error = %err, "english normalization unavailable; passing text through");
            }
            text
        }
    }
}

/// One-time construction, cached for the life of the process. The `Err`
/// is cached too: a backend that failed to build once will not be retried.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn backend() -> std::result::Result<&'static EnNormalizer, &'static str> {
    use once_cell::sync::OnceCell;
    static BACKEND: OnceCell<std::result::Result<EnNormalizer, String>> = OnceCell::new();

    match BACKEND.get_or_init(|| EnNormalizer::new().map_err(|e| format!("{e:#}"))) {
        Ok(backend) => Ok(backend),
        Err(msg) => Err(msg.as_str()),
    }
}
