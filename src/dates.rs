use chrono::{DateTime, NaiveDate};

/// Human label for a recording date relative to `today`.
///
/// Unparseable input comes back unchanged.
pub fn relative_label(raw: &str, today: NaiveDate) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };

    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        2..=7 => format!("this {}", date.format("%A")),
        8..=14 => format!("next {}", date.format("%A")),
        _ => date.format("%B %-d, %Y").to_string(),
    }
}

/// `YYYY-MM-DD`, or the calendar date written in an RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
