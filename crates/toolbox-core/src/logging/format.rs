//! Log records and template formatting

use chrono::{DateTime, Local};

use super::level::LogLevel;

/// Default record template: `timestamp - name - level - message`
pub const DEFAULT_FORMAT: &str = "{asctime} - {name} - {levelname} - {message}";

/// Default timestamp template (chrono strftime syntax)
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single log event
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Name of the logger that created the record
    pub name: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(name: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

/// Renders records through a `{placeholder}` template
///
/// Known placeholders: `{asctime}`, `{name}`, `{levelname}`, `{levelno}`
/// and `{message}`. Anything else is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormatter {
    template: String,
    date_format: String,
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, DEFAULT_DATE_FORMAT)
    }
}

impl RecordFormatter {
    pub fn new(template: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            date_format: date_format.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Format a record into one line, without the trailing newline
    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start..];
            let Some(end) = after.find('}') else {
                out.push_str(after);
                return out;
            };

            let key = &after[1..end];
            match key {
                "asctime" => out.push_str(&self.format_time(record)),
                "name" => out.push_str(&record.name),
                "levelname" => out.push_str(record.level.as_str()),
                "levelno" => out.push_str(&record.level.rank().to_string()),
                "message" => out.push_str(&record.message),
                _ => out.push_str(&after[..=end]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn format_time(&self, record: &LogRecord) -> String {
        use std::fmt::Write;

        // An invalid strftime template makes chrono's Display fail; fall back
        // to the default template instead of panicking inside `to_string`.
        let mut stamp = String::new();
        if write!(stamp, "{}", record.timestamp.format(&self.date_format)).is_err() {
            stamp.clear();
            let _ = write!(stamp, "{}", record.timestamp.format(DEFAULT_DATE_FORMAT));
        }
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_record(level: LogLevel, message: &str) -> LogRecord {
        let mut record = LogRecord::new("svc.worker", level, message);
        record.timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        record
    }

    #[test]
    fn test_default_format() {
        let formatter = RecordFormatter::default();
        let line = formatter.format(&fixed_record(LogLevel::Info, "started"));
        assert_eq!(line, "2024-03-09 14:05:07 - svc.worker - INFO - started");
    }

    #[test]
    fn test_custom_format_and_date() {
        let formatter = RecordFormatter::new("[{levelname}:{levelno}] {name}: {message} @ {asctime}", "%H:%M");
        let line = formatter.format(&fixed_record(LogLevel::Warning, "slow frame"));
        assert_eq!(line, "[WARNING:30] svc.worker: slow frame @ 14:05");
    }

    #[test]
    fn test_unknown_and_unterminated_placeholders_are_kept() {
        let formatter = RecordFormatter::new("{thread} {message} {oops", DEFAULT_DATE_FORMAT);
        let line = formatter.format(&fixed_record(LogLevel::Error, "boom"));
        assert_eq!(line, "{thread} boom {oops");
    }
}
