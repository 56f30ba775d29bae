use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 delivery date.
///
/// Bare dates land on midnight, offsets are normalized to UTC, and an empty
/// string means the client did not ask for a delivery date.
pub fn parse_delivery_date(raw: Option<&str>) -> Result<Option<NaiveDateTime>, String>{
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None)
    };

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date_time.naive_utc()))
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(date_time))
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| format!("Invalid isoformat string: '{}'", raw))
}
