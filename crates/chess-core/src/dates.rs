use chrono::NaiveDate;

pub const NO_DATE_RANGE: &str = "N/A";

/// Human-readable span covered by a set of normalised game dates.
///
/// Unparseable dates (PGN uses `????.??.??` for unknown) are skipped.
pub fn format_date_range(dates: &[String]) -> String {
    let parsed: Vec<NaiveDate> = dates
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .collect();

    let (Some(first), Some(last)) = (parsed.iter().min().copied(), parsed.iter().max().copied())
    else {
        return NO_DATE_RANGE.to_string();
    };

    if first == last {
        first.format("%Y-%m-%d").to_string()
    } else {
        format!("{} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
    }
}
