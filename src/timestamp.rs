use crate::error::RegistryError;
use chrono::{Local, TimeZone, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render unix seconds (now when `None`) as `YYYY-MM-DD HH:MM:SS` in local time.
pub fn format_timestamp(time: Option<i64>) -> Result<String, RegistryError> {
    format_timestamp_in(time, &Local)
}

pub fn format_timestamp_in<Tz>(time: Option<i64>, tz: &Tz) -> Result<String, RegistryError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let secs = time.unwrap_or_else(|| Utc::now().timestamp());
    let dt = tz
        .timestamp_opt(secs, 0)
        .single()
        .ok_or(RegistryError::InvalidTimestamp(secs))?;
    Ok(dt.format(TIMESTAMP_FORMAT).to_string())
}
