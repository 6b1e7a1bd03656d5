//! Date/time detection for text columns.
//!
//! A value "parses" if any of the known formats accepts the whole (trimmed)
//! string. Failure is not an error; callers just get `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// A date/time format the detector tries, in order.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeFormat {
    /// strftime pattern
    pub pattern: &'static str,
    /// Example value
    pub example: &'static str,
    /// Whether the pattern carries a time-of-day component
    pub has_time: bool,
}

/// Formats with a time-of-day component (ordered by how common they are in exports)
pub const DATETIME_FORMATS: &[DateTimeFormat] = &[
    DateTimeFormat {
        pattern: "%Y-%m-%d %H:%M:%S",
        example: "2024-05-31 18:30:00",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%dT%H:%M:%S",
        example: "2024-05-31T18:30:00",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%d %H:%M:%S%.f",
        example: "2024-05-31 18:30:00.250",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%.f",
        example: "2024-05-31T18:30:00.250",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%d %H:%M",
        example: "2024-05-31 18:30",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%dT%H:%M",
        example: "2024-05-31T18:30",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%Y/%m/%d %H:%M:%S",
        example: "2024/05/31 18:30:00",
        has_time: true,
    },
    // Month-first before day-first, as ambiguous values are read US-style.
    DateTimeFormat {
        pattern: "%m/%d/%Y %H:%M:%S",
        example: "05/31/2024 18:30:00",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%m/%d/%Y %H:%M",
        example: "05/31/2024 18:30",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%d/%m/%Y %H:%M:%S",
        example: "31/05/2024 18:30:00",
        has_time: true,
    },
    DateTimeFormat {
        pattern: "%d.%m.%Y %H:%M",
        example: "31.05.2024 18:30",
        has_time: true,
    },
];

/// Date-only formats; parsed values land on midnight.
pub const DATE_FORMATS: &[DateTimeFormat] = &[
    DateTimeFormat {
        pattern: "%Y-%m-%d",
        example: "2024-05-31",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%Y/%m/%d",
        example: "2024/05/31",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%m/%d/%Y",
        example: "05/31/2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%d/%m/%Y",
        example: "31/05/2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%m-%d-%Y",
        example: "05-31-2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%d-%m-%Y",
        example: "31-05-2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%d.%m.%Y",
        example: "31.05.2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%B %d, %Y",
        example: "May 31, 2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%b %d, %Y",
        example: "May 31, 2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%d %B %Y",
        example: "31 May 2024",
        has_time: false,
    },
    DateTimeFormat {
        pattern: "%d %b %Y",
        example: "31 May 2024",
        has_time: false,
    },
];

/// Try to parse a value as a date or date/time.
///
/// RFC 3339 values with an offset keep their local wall-clock time.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format.pattern) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format.pattern) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}
