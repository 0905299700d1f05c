use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CanonicalRecord, Category, RawRecord, Severity};

// First matching category wins; General is the catch-all.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Safety,
        &[
            "safety", "alert", "crime", "scam", "theft", "pickpocket", "robbery", "protest",
            "unrest", "curfew", "police", "demonstration",
        ],
    ),
    (
        Category::Weather,
        &[
            "weather", "storm", "flood", "hurricane", "typhoon", "cyclone", "monsoon", "heatwave",
            "earthquake", "wildfire", "snow",
        ],
    ),
    (
        Category::Health,
        &["health", "outbreak", "disease", "virus", "epidemic", "hospital", "vaccination"],
    ),
    (
        Category::Transport,
        &["flight", "airport", "airline", "rail", "train", "strike", "transit", "road closure"],
    ),
    (
        Category::Event,
        &["festival", "concert", "exhibition", "parade", "ceremony", "holiday"],
    ),
];

const HIGH_SEVERITY_KEYWORDS: &[&str] =
    &["emergency", "critical", "danger", "evacuat", "fatal", "severe", "deadly"];

const MEDIUM_SEVERITY_KEYWORDS: &[&str] =
    &["caution", "advisory", "warning", "disruption", "delay", "avoid"];

// "in Bangkok", "near Chiang Mai, Thailand" and similar; a run of capitalized
// words after a locating preposition, optionally with a comma-joined region.
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:in|near|across|around)\s+([A-Z][A-Za-z]+(?:\s[A-Z][A-Za-z]+)*(?:,\s*[A-Z][A-Za-z]+(?:\s[A-Z][A-Za-z]+)*)?)",
    )
    .expect("location pattern")
});

/// Maps a provider-shaped record into the canonical shape. Heuristic and
/// best-effort: misclassification is acceptable, failure is not. Category and
/// severity always come out populated; `default_location` fills in when the
/// text yields nothing.
pub fn normalize(raw: &RawRecord, default_location: Option<&str>) -> CanonicalRecord {
    let text = format!("{} {}", raw.title, raw.description).to_lowercase();
    let location = infer_location(&format!("{} {}", raw.title, raw.description))
        .or_else(|| default_location.map(str::to_string));

    CanonicalRecord {
        title: raw.title.clone(),
        description: raw.description.clone(),
        published_at: raw.published_at.clone(),
        category: infer_category(&text),
        severity: infer_severity(&text),
        location,
        source: raw.source.clone(),
        url: raw.url.clone(),
    }
}

/// Case-insensitive substring match against per-category keyword sets; expects
/// already-lowercased text.
pub fn infer_category(lower_text: &str) -> Category {
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| lower_text.contains(keyword)) {
            return *category;
        }
    }
    Category::General
}

pub fn infer_severity(lower_text: &str) -> Severity {
    if HIGH_SEVERITY_KEYWORDS
        .iter()
        .any(|keyword| lower_text.contains(keyword))
    {
        return Severity::High;
    }
    if MEDIUM_SEVERITY_KEYWORDS
        .iter()
        .any(|keyword| lower_text.contains(keyword))
    {
        return Severity::Medium;
    }
    Severity::Low
}

pub fn infer_location(text: &str) -> Option<String> {
    LOCATION_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().to_string())
}
