use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, de::IgnoredAny};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
    Unsupported(IgnoredAny),
}

/// Accepts epoch milliseconds, RFC 3339, or a naive ISO-8601 string (read as
/// local time). Anything else decodes to `None` rather than failing the page.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Millis(ms)) => from_millis(ms),
        Some(RawTimestamp::Fractional(ms)) => from_millis(ms as i64),
        Some(RawTimestamp::Text(text)) => parse_text(&text),
        Some(RawTimestamp::Unsupported(_)) | None => None,
    })
}

pub fn from_millis(ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(ms).single()
}

pub fn parse_text(text: &str) -> Option<DateTime<Local>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}
