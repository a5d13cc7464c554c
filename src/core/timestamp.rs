//! Timestamp and duration formatting, plus the serializable handler config
//!
//! Record timestamps and time-valued attributes are always rendered in UTC.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::{Duration, SystemTime};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_color_handler::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Console.format(&at).unwrap(), "08 Jan 25 10:30:45 UTC");
/// assert_eq!(TimestampFormat::Rfc822.format(&at).unwrap(), "08 Jan 25 10:30 UTC");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Day, month, year, time with seconds: `08 Jan 25 10:30:45 UTC`
    ///
    /// Default for the record timestamp.
    #[default]
    Console,

    /// RFC 822 style, minutes precision: `08 Jan 25 10:30 UTC`
    ///
    /// Default for time-valued attributes.
    Rfc822,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_color_handler::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S".to_string());
    /// assert!(format.validate().is_ok());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// Fails with `InvalidInput` when a custom pattern cannot be rendered.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        let pattern = match self {
            TimestampFormat::Console => "%d %b %y %H:%M:%S %Z",
            TimestampFormat::Rfc822 => "%d %b %y %H:%M %Z",
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3fZ",
            TimestampFormat::Iso8601Micros => "%Y-%m-%dT%H:%M:%S%.6fZ",
            TimestampFormat::Rfc3339 => return Ok(datetime.to_rfc3339()),
            TimestampFormat::Unix => return Ok(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => return Ok(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(format_str) => format_str.as_str(),
        };

        let mut out = String::with_capacity(pattern.len() + 8);
        write!(out, "{}", datetime.format(pattern)).map_err(|_| {
            LoggerError::invalid_input(format!("cannot render timestamp pattern '{}'", pattern))
        })?;
        Ok(out)
    }

    /// Format a `SystemTime` according to this format
    pub fn format_system_time(&self, timestamp: &SystemTime) -> Result<String> {
        let datetime: DateTime<Utc> = (*timestamp).into();
        self.format(&datetime)
    }

    /// Reject custom patterns chrono cannot parse
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime pattern '{}'", format_str),
                ));
            }
        }
        Ok(())
    }
}

/// Render a duration with the largest fitting units: `1h2m3.5s`, `1.5ms`, `0s`
///
/// Below one second a single unit is used (`ns`, `µs`, `ms`); from one second
/// up, hours and minutes are spelled out and seconds keep their fraction.
pub fn format_duration(duration: Duration) -> String {
    const MICRO: u128 = 1_000;
    const MILLI: u128 = 1_000_000;
    const SECOND: u128 = 1_000_000_000;

    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < MILLI {
        return format!("{}µs", decimal(nanos, MICRO, 3));
    }
    if nanos < SECOND {
        return format!("{}ms", decimal(nanos, MILLI, 6));
    }

    let total = duration.as_secs();
    let (hours, minutes) = (total / 3600, (total % 3600) / 60);
    let seconds = u128::from(total % 60) * SECOND + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&decimal(seconds, SECOND, 9));
    out.push('s');
    out
}

fn decimal(value: u128, unit: u128, places: usize) -> String {
    let whole = value / unit;
    let rest = value % unit;
    if rest == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0width$}", rest, width = places);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Serializable handler configuration
///
/// # Examples
///
/// ```
/// use rust_color_handler::core::{HandlerConfig, LogLevel, TimestampFormat};
///
/// let config = HandlerConfig::from_json(
///     r#"{"timestamp_format":"Iso8601","min_level":"Debug"}"#,
/// ).unwrap();
/// assert_eq!(config.timestamp_format, TimestampFormat::Iso8601);
/// assert_eq!(config.min_level, LogLevel::Debug);
/// assert_eq!(config.time_format, TimestampFormat::Rfc822);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Format of the timestamp that opens every record
    pub timestamp_format: TimestampFormat,
    /// Format of time-valued attributes
    pub time_format: TimestampFormat,
    /// Records below this level are not enabled
    pub min_level: LogLevel,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Console,
            time_format: TimestampFormat::Rfc822,
            min_level: LogLevel::Info,
        }
    }
}

impl HandlerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: HandlerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.timestamp_format.validate()?;
        self.time_format.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_console_format() {
        let result = TimestampFormat::Console.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "08 Jan 25 10:30:45 UTC");
    }

    #[test]
    fn test_rfc822_format() {
        let result = TimestampFormat::Rfc822.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "08 Jan 25 10:30 UTC");
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "2025-01-08T10:30:45.123Z");

        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(secs, 1736332245);
        assert_eq!(millis, 1736332245123);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()).unwrap(), "2025/01/08 10:30");
    }

    #[test]
    fn test_invalid_custom_format() {
        let format = TimestampFormat::Custom("%Y-%Q".to_string());
        assert!(matches!(
            format.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            format.format(&fixed_datetime()),
            Err(LoggerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_format_duration_sub_second() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(750)), "750ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(2_250)), "2.25ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn test_format_duration_seconds_and_up() {
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(3_500)), "3.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
        assert_eq!(format_duration(Duration::from_secs(5_400)), "1h30m0s");
        assert_eq!(
            format_duration(Duration::from_secs(3_723) + Duration::from_millis(500)),
            "1h2m3.5s"
        );
    }

    #[test]
    fn test_config_defaults_and_json() {
        let config = HandlerConfig::default();
        assert_eq!(config.timestamp_format, TimestampFormat::Console);
        assert_eq!(config.time_format, TimestampFormat::Rfc822);
        assert_eq!(config.min_level, LogLevel::Info);

        let json = config
            .clone()
            .with_timestamp_format(TimestampFormat::Custom("%H:%M".to_string()))
            .to_json()
            .unwrap();
        let parsed = HandlerConfig::from_json(&json).unwrap();
        assert_eq!(
            parsed.timestamp_format,
            TimestampFormat::Custom("%H:%M".to_string())
        );
    }

    #[test]
    fn test_config_rejects_bad_pattern() {
        let json = r#"{"time_format":{"Custom":"%Q"}}"#;
        assert!(matches!(
            HandlerConfig::from_json(json),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
