use std::{fmt::Display, str::FromStr, sync::LazyLock};

use chrono::{Datelike, Weekday};
use gtfs_structures::Calendar;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calendar::calendar_error::CalendarError;

/// single-letter weekday codes in Monday..Sunday order. Thursday is `R` and
/// Sunday is `U` so that every day has a distinct letter.
pub const WEEKDAY_CODES: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

/// each letter is optional, appears at most once, and letters appear in
/// the fixed order of [`WEEKDAY_CODES`].
static WEEKDAY_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M?T?W?R?F?S?U?$").unwrap_or_else(|e| panic!("invalid weekday pattern: {e}"))
});

/// the days of a week on which a weekly recurrence is active, in
/// Monday..Sunday order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayFlags(pub [bool; 7]);

impl WeekdayFlags {
    pub fn new(
        monday: bool,
        tuesday: bool,
        wednesday: bool,
        thursday: bool,
        friday: bool,
        saturday: bool,
        sunday: bool,
    ) -> WeekdayFlags {
        WeekdayFlags([
            monday, tuesday, wednesday, thursday, friday, saturday, sunday,
        ])
    }

    /// parses a weekday code such as `MTWRF` or `SU`. lowercase input is
    /// accepted. an empty code is valid and yields a pattern with no days.
    pub fn from_code(code: &str) -> Result<WeekdayFlags, CalendarError> {
        let upper = code.to_uppercase();
        if !WEEKDAY_CODE_PATTERN.is_match(&upper) {
            return Err(CalendarError::InvalidWeekdayCode(code.to_string()));
        }
        let mut flags = [false; 7];
        for (flag, letter) in flags.iter_mut().zip(WEEKDAY_CODES) {
            *flag = upper.contains(letter);
        }
        Ok(WeekdayFlags(flags))
    }

    /// the weekday code for this pattern, which is also the id of a service
    /// synthesized from it. all-false flags produce an empty string.
    pub fn code(&self) -> String {
        self.0
            .iter()
            .zip(WEEKDAY_CODES)
            .filter(|(flag, _)| **flag)
            .map(|(_, letter)| letter)
            .collect()
    }

    pub fn runs_on(&self, weekday: Weekday) -> bool {
        self.0[weekday.num_days_from_monday() as usize]
    }

    pub fn runs_on_date<D: Datelike>(&self, date: &D) -> bool {
        self.runs_on(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|flag| !flag)
    }
}

impl From<&Calendar> for WeekdayFlags {
    fn from(calendar: &Calendar) -> Self {
        WeekdayFlags::new(
            calendar.monday,
            calendar.tuesday,
            calendar.wednesday,
            calendar.thursday,
            calendar.friday,
            calendar.saturday,
            calendar.sunday,
        )
    }
}

impl FromStr for WeekdayFlags {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeekdayFlags::from_code(s)
    }
}

impl Display for WeekdayFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
