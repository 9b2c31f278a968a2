use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Calendar parts derived from an observation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Day of month (1-31)
    pub day: u32,
    /// Hour of day (0-23)
    pub hour: u32,
    pub minute: u32,
}

impl From<&NaiveDateTime> for CalendarFields {
    fn from(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
            minute: ts.minute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_calendar_fields() {
        let ts = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 45, 0)
            .unwrap();
        let cal = CalendarFields::from(&ts);
        assert_eq!(cal, CalendarFields { year: 2023, month: 12, day: 31, hour: 23, minute: 45 });
    }
}
