use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use scraper::Html;

use crate::types::{AuctionRecord, NOT_SPECIFIED, NOT_SPECIFIED_F, PropertyType};
use crate::utils::AuctionFilter;

/// Segments shorter than this (after trimming) cannot hold a full auction notice.
pub const MIN_SEGMENT_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];
const APARTMENT_KEYWORDS: [&str; 3] = ["departamento", "depto", "dpto"];
const HOUSE_KEYWORDS: [&str; 2] = ["casa", "vivienda"];

static RE_ANNOUNCEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\w+\s+\d{1,2}\s+\w+\s+\d{4},\s+\d{1,2}:\d{2}")
        .expect("invalid regex: announcement")
});

static RE_DATE_TIME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_rules(&[
        // Martes 24 jun 2025, 14:30
        r"(?i)\w+\s+(?P<day>\d{1,2})\s+(?P<month>\w+)\s+(?P<year>\d{4}),\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})",
        // 24 de junio de 2025 a las 14:30
        r"(?i)(?P<day>\d{1,2})\s+de\s+(?P<month>\w+)\s+de\s+(?P<year>\d{4})\s+a\s+las\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})",
    ])
});

static RE_COURT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_rules(&[
        r"(?i)Remate[:\s]*([^,]+Juzgado[^,]+)",
        r"(?i)([^,]*Juzgado[^,]*)",
        r"(?i)Tribunal[:\s]*([^,]+)",
    ])
});

static RE_COURT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Remate[:\s]*|Se\s+rematará\b[^,]*?(?:,\s*|\s+(?:ante|en)\s+(?:el\s+)?))")
        .expect("invalid regex: court prefix")
});

static RE_ROLL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_rules(&[
        r"(?i)Rol\s*:?\s*(?:N[º°o]?\.?\s*)?([A-Z]?-?\d+-\d+)",
        r"(?i)caratulados\s+[^,]+,\s*Rol\s*:?\s*(?:N[º°o]?\.?\s*)?([A-Z]?-?\d+-\d+)",
        r"(?i)causa\s+[^,]+,?\s*Rol\s*:?\s*(?:N[º°o]?\.?\s*)?([A-Z]?-?\d+-\d+)",
    ])
});

static RE_COMUNA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)comuna\s+de\s+([^,]+)").expect("invalid regex: comuna")
});

static RE_ADDRESS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_rules(&[
        r"(?i)ubicado\s+en\s+([^,]+(?:número?\s*\d+[^,]*)?)",
        r"(?i)calle\s+([^,]+(?:número?\s*\d+[^,]*)?)",
        r"(?i)pasaje\s+([^,]+(?:número?\s*\d+[^,]*)?)",
    ])
});

static RE_ADDRESS_COMUNA_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\s*,?\s*comuna\s+de.*$").expect("invalid regex: address tail")
});

static RE_PRICE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_rules(&[
        r"(?i)Mínimo\s+[^$]*\$\s*([\d.,]+)",
        r"(?i)precio\s+mínimo[^$]*\$\s*([\d.,]+)",
        r"(?i)U\.?F\.?\s*([\d.,]+)",
        r"(?i)mínimo\s+para\s+las\s+posturas\s*\$\s*([\d.,]+)",
    ])
});

static RE_UF_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bU\.?F\b").expect("invalid regex: uf marker"));

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("invalid regex: email")
});

fn compile_rules(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid regex: extractor rule"))
        .collect()
}

/// Evaluates a rule table in order and returns the captures of the first hit.
fn first_captures<'t>(rules: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    rules.iter().find_map(|re| re.captures(text))
}

fn month_number(month: &str) -> &'static str {
    match month.to_lowercase().as_str() {
        "enero" | "ene" => "01",
        "febrero" | "feb" => "02",
        "marzo" | "mar" => "03",
        "abril" | "abr" => "04",
        "mayo" | "may" => "05",
        "junio" | "jun" => "06",
        "julio" | "jul" => "07",
        "agosto" | "ago" => "08",
        "septiembre" | "sep" => "09",
        "octubre" | "oct" => "10",
        "noviembre" | "nov" => "11",
        "diciembre" | "dic" => "12",
        _ => "01",
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain text of a page: every text node in document order, scripts and styles excluded.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent()?;
            match parent.value().as_element() {
                Some(element) if SKIPPED_ELEMENTS.contains(&element.name()) => None,
                _ => Some(&**text),
            }
        })
        .collect()
}

/// Splits page text in front of every date announcement. The leading text
/// before the first announcement is kept as its own piece.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for m in RE_ANNOUNCEMENT.find_iter(text) {
        segments.push(&text[start..m.start()]);
        start = m.start();
    }
    segments.push(&text[start..]);

    segments
}

pub fn is_candidate_segment(segment: &str) -> bool {
    segment.trim().chars().count() >= MIN_SEGMENT_CHARS
}

/// Splits and drops pieces too short to describe an auction.
pub fn segment_page(text: &str) -> Vec<&str> {
    split_segments(text)
        .into_iter()
        .filter(|s| is_candidate_segment(s))
        .collect()
}

/// Returns `(YYYY-MM-DD, HH:MM)` or `(None, None)` when no date phrase is found.
pub fn extract_date_time(text: &str) -> (Option<String>, Option<String>) {
    let Some(caps) = first_captures(&RE_DATE_TIME, text) else {
        return (None, None);
    };

    let date = format!(
        "{}-{}-{:0>2}",
        &caps["year"],
        month_number(&caps["month"]),
        &caps["day"]
    );
    let time = format!("{:0>2}:{}", &caps["hour"], &caps["minute"]);

    (Some(date), Some(time))
}

/// Runs of whitespace in the capture collapse to one space.
pub fn extract_court(text: &str) -> String {
    first_captures(&RE_COURT, text)
        .map(|caps| normalize_whitespace(&caps[1]))
        .map(|court| RE_COURT_PREFIX.replace(&court, "").trim().to_string())
        .filter(|court| !court.is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

pub fn extract_roll(text: &str) -> String {
    first_captures(&RE_ROLL, text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Apartment keywords win over house keywords.
pub fn extract_property_type(text: &str) -> PropertyType {
    let lower = text.to_lowercase();

    if APARTMENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        PropertyType::Apartment
    } else if HOUSE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        PropertyType::House
    } else {
        PropertyType::Other
    }
}

/// Returns `(comuna, address)`.
pub fn extract_location(text: &str) -> (String, String) {
    let comuna = RE_COMUNA
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| NOT_SPECIFIED_F.to_string());

    let address = first_captures(&RE_ADDRESS, text)
        .map(|caps| {
            RE_ADDRESS_COMUNA_TAIL
                .replace(caps[1].trim(), "")
                .into_owned()
        })
        .unwrap_or_else(|| NOT_SPECIFIED_F.to_string());

    (comuna, address)
}

pub fn extract_min_price(text: &str) -> String {
    let Some(caps) = first_captures(&RE_PRICE, text) else {
        return NOT_SPECIFIED.to_string();
    };

    let amount = caps[1].trim_end_matches(['.', ',']);
    if RE_UF_MARKER.is_match(&caps[0]) {
        format!("UF {}", amount)
    } else {
        format!("${}", amount)
    }
}

pub fn extract_email(text: &str) -> String {
    RE_EMAIL
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

pub fn truncate_description(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        let head: String = trimmed.chars().take(DESCRIPTION_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// Runs every field extractor over a segment that already passed both filters.
pub fn assemble_record(segment: &str, date: NaiveDate, time: String) -> AuctionRecord {
    let (comuna, address) = extract_location(segment);

    AuctionRecord {
        date,
        time,
        court: extract_court(segment),
        roll: extract_roll(segment),
        property_type: extract_property_type(segment),
        comuna,
        address,
        min_price: extract_min_price(segment),
        email: extract_email(segment),
        description: truncate_description(segment),
    }
}

/// Relevance, then date extraction, then range check, then full extraction.
pub fn parse_segment(segment: &str, filter: &AuctionFilter) -> Option<AuctionRecord> {
    if !is_candidate_segment(segment) || !AuctionFilter::is_relevant(segment) {
        return None;
    }

    let (Some(date_text), Some(time)) = extract_date_time(segment) else {
        log::debug!("Skipping segment without a date phrase");
        return None;
    };

    let Ok(date) = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d") else {
        log::warn!("Skipping segment with invalid date '{}'", date_text);
        return None;
    };

    if !filter.contains(date) {
        log::debug!("Skipping auction on {} outside the date window", date);
        return None;
    }

    Some(assemble_record(segment, date, time))
}

pub fn parse_auction_page(html: &str, filter: &AuctionFilter) -> Vec<AuctionRecord> {
    let text = page_text(html);
    let segments = segment_page(&text);
    log::info!("Found {} candidate auction blocks", segments.len());

    segments
        .into_iter()
        .filter_map(|segment| parse_segment(segment, filter))
        .inspect(|record| {
            log::info!(
                "Auction found: {} - {} in {}",
                record.date,
                record.property_type,
                record.comuna
            )
        })
        .collect()
}
