use crate::types::{CanonicalRecord, Category, Severity};

/// Terminal fallback tier: generic, non-location-specific records. Always
/// non-empty, cannot fail — this is what makes the aggregation contract total.
pub fn placeholder_records(operation: &str) -> Vec<CanonicalRecord> {
    if operation.to_lowercase().contains("event") {
        return event_placeholders();
    }
    advisory_placeholders()
}

fn record(
    title: &str,
    description: &str,
    category: Category,
    severity: Severity,
) -> CanonicalRecord {
    CanonicalRecord {
        title: title.to_string(),
        description: description.to_string(),
        published_at: None,
        category,
        severity,
        location: None,
        source: Some("travelbrief".to_string()),
        url: None,
    }
}

fn advisory_placeholders() -> Vec<CanonicalRecord> {
    vec![
        record(
            "Keep copies of your travel documents",
            "Store digital and paper copies of your passport and visas separately from the originals.",
            Category::Safety,
            Severity::Low,
        ),
        record(
            "Check local weather before heading out",
            "Conditions can change quickly; confirm the forecast with an official local source.",
            Category::Weather,
            Severity::Low,
        ),
        record(
            "Know your emergency numbers",
            "Save the local equivalents of police, ambulance and your embassy's contact line.",
            Category::Safety,
            Severity::Medium,
        ),
        record(
            "Confirm transport schedules on the day",
            "Strikes and seasonal timetables affect trains, ferries and regional flights.",
            Category::Transport,
            Severity::Low,
        ),
    ]
}

fn event_placeholders() -> Vec<CanonicalRecord> {
    vec![
        record(
            "Check official tourism listings",
            "Municipal tourism sites list markets, exhibitions and seasonal festivals.",
            Category::Event,
            Severity::Low,
        ),
        record(
            "Book popular events ahead",
            "Major festivals and venues sell out days in advance during high season.",
            Category::Event,
            Severity::Low,
        ),
        record(
            "Expect crowds around public holidays",
            "Local holidays concentrate foot traffic and stretch transport capacity.",
            Category::Event,
            Severity::Medium,
        ),
    ]
}
