//! Date and time display utilities.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` that formats it in the system time zone.
///
/// # Format
///
/// `YYYY-MM-DD HH:MM TZ`, with the time in 24-hour format and the zone
/// abbreviation (e.g. UTC, CET, JST).
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// A due date with its distance from `today`.
///
/// ```rust
/// use jiff::civil::date;
/// use quadrant_core::display::DueDate;
///
/// let today = date(2024, 3, 10);
/// assert_eq!(DueDate::new(date(2024, 3, 10), today).to_string(), "2024-03-10 (today)");
/// assert_eq!(DueDate::new(date(2024, 3, 13), today).to_string(), "2024-03-13 (in 3 days)");
/// assert_eq!(DueDate::new(date(2024, 3, 9), today).to_string(), "2024-03-09 (1 day overdue)");
/// ```
pub struct DueDate {
    pub date: Date,
    pub today: Date,
}

impl DueDate {
    pub fn new(date: Date, today: Date) -> Self {
        Self { date, today }
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = (self.date - self.today).get_days();
        let plural = |n: i32| if n.abs() == 1 { "day" } else { "days" };
        match days {
            0 => write!(f, "{} (today)", self.date),
            1 => write!(f, "{} (tomorrow)", self.date),
            d if d > 0 => write!(f, "{} (in {d} {})", self.date, plural(d)),
            d => write!(f, "{} ({} {} overdue)", self.date, -d, plural(d)),
        }
    }
}
