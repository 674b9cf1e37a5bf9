//! Fact extraction: raw document text → typed facts.
//!
//! Pure string work — dates, monetary amounts, contracting parties,
//! frequency-ranked keywords. Malformed input yields empty lists,
//! never an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{DocType, ExtractedAmount, ParsedDocument};

/// Upper bound on extracted parties per document.
const MAX_PARTIES: usize = 5;

/// Upper bound on extracted keywords per document.
const MAX_KEYWORDS: usize = 10;

/// Amounts below this are noise (page numbers, item counts).
const MIN_AMOUNT: i64 = 1000;

/// Counting/calendar unit suffixes that mark a number as a quantity,
/// not money: 명(people) 개(items) 회(times) 호(issue) 건(cases)
/// 일(days) 월(months) 년(years).
const EXCLUDE_UNITS: [char; 8] = ['명', '개', '회', '호', '건', '일', '월', '년'];

static RE_DATE_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap());
static RE_DATE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());
static RE_DATE_KOREAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일").unwrap());

static RE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+").unwrap());

/// Per-unit price times a count ("80,000원×2명") is a quantity
/// expression; the matched number is not a document amount.
static RE_QUANTITY_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*원?\s*[×xX*]\s*\d+\s*[명개회호건일월년]").unwrap());

/// Company names wrapped by a corporate-suffix marker on either side.
static RE_PARTIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\(주\)\s*[가-힣A-Za-z0-9]+",
        r"[가-힣A-Za-z0-9]+\(주\)",
        r"주식회사\s*[가-힣A-Za-z0-9]+",
        r"[가-힣A-Za-z0-9]+\s*주식회사",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_HANGUL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[가-힣]{2,6}").unwrap());

/// Function-word noise excluded from keyword ranking.
const STOPWORDS: [&str; 28] = [
    "있다", "없다", "하다", "되다", "이다", "것", "수", "등", "및", "또는", "위해", "대한",
    "관련", "따라", "대하여", "위하여", "있는", "없는", "하는", "되는", "같은", "위한", "통해",
    "에서", "으로", "부터", "까지", "하여",
];

/// Extract all facts from one decoded file. The document type is left
/// uncategorized; classification is a separate pass.
pub fn extract_facts(filename: &str, raw_text: &str) -> ParsedDocument {
    ParsedDocument {
        filename: filename.to_string(),
        doc_type: DocType::Uncategorized,
        dates: extract_dates(raw_text),
        amounts: extract_amounts(raw_text),
        parties: extract_parties(raw_text),
        keywords: extract_keywords(raw_text),
        raw_text: raw_text.to_string(),
    }
}

/// Recognized surface forms: `2024.3.1`, `2024-3-1`, `2024년 3월 1일`.
/// All normalize to zero-padded `YYYY.MM.DD`; calendar-invalid
/// candidates and exact duplicates are dropped.
pub fn extract_dates(text: &str) -> Vec<String> {
    let mut dates = Vec::new();

    for re in [&*RE_DATE_DOT, &*RE_DATE_DASH, &*RE_DATE_KOREAN] {
        for caps in re.captures_iter(text) {
            if let Some(normalized) = normalize_date(&caps[1], &caps[2], &caps[3]) {
                if !dates.contains(&normalized) {
                    dates.push(normalized);
                }
            }
        }
    }

    dates
}

fn normalize_date(year: &str, month: &str, day: &str) -> Option<String> {
    let y: i32 = year.parse().ok()?;
    let m: u32 = month.parse().ok()?;
    let d: u32 = day.parse().ok()?;
    // Calendar check only — no timezone or locale semantics.
    NaiveDate::from_ymd_opt(y, m, d)?;
    Some(format!("{y:04}.{m:02}.{d:02}"))
}

/// Comma-grouped integers ≥ 1000, excluding quantity expressions.
/// Deduplicated by numeric value; the first textual form wins. The
/// display text carries a currency suffix only when `원` literally
/// appears within 3 characters after the match.
pub fn extract_amounts(text: &str) -> Vec<ExtractedAmount> {
    let mut amounts: Vec<ExtractedAmount> = Vec::new();

    for m in RE_AMOUNT.find_iter(text) {
        let tail = &text[m.end()..];

        // A counting unit within the next 2 characters marks a quantity.
        let suffix: String = tail.chars().take(2).collect();
        if suffix
            .trim()
            .chars()
            .any(|c| EXCLUDE_UNITS.contains(&c))
        {
            continue;
        }
        if RE_QUANTITY_TAIL.is_match(tail) {
            continue;
        }

        let value: i64 = match m.as_str().replace(',', "").parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if value < MIN_AMOUNT {
            continue;
        }
        if amounts.iter().any(|a| a.value == value) {
            continue;
        }

        let has_currency = tail.chars().take(3).any(|c| c == '원');
        let display = if has_currency {
            format!("{}원", m.as_str())
        } else {
            m.as_str().to_string()
        };

        amounts.push(ExtractedAmount {
            text: display,
            value,
        });
    }

    amounts
}

/// Company names in any of the four corporate-marker forms, first-seen
/// order, capped at 5.
pub fn extract_parties(text: &str) -> Vec<String> {
    let mut parties: Vec<String> = Vec::new();

    for re in RE_PARTIES.iter() {
        for m in re.find_iter(text) {
            let name = m.as_str().to_string();
            if !parties.contains(&name) {
                parties.push(name);
            }
        }
    }

    parties.truncate(MAX_PARTIES);
    parties
}

/// Frequency-ranked Hangul tokens (runs of 2–6 syllables), stopwords
/// removed, top 10. Ties break toward earlier first occurrence.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, m) in RE_HANGUL_RUN.find_iter(text).enumerate() {
        let word = m.as_str();
        if STOPWORDS.contains(&word) {
            continue;
        }
        let entry = freq.entry(word).or_insert((0, index));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word.to_string())
        .collect()
}
