use std::collections::HashMap;

use chrono::NaiveDate;
use gtfs_structures::{Calendar, CalendarDate, Exception};
use itertools::Itertools;

use crate::calendar::{activation_ops, WeekdayFlags};

/// weekly recurrence of a [`Service`] over an inclusive date range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarPattern {
    pub days: WeekdayFlags,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CalendarPattern {
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }
}

impl From<&Calendar> for CalendarPattern {
    fn from(calendar: &Calendar) -> Self {
        CalendarPattern {
            days: WeekdayFlags::from(calendar),
            start_date: calendar.start_date,
            end_date: calendar.end_date,
        }
    }
}

/// a GTFS service: the combined calendar.txt and calendar_dates.txt entries
/// sharing one service_id. the service owns its recurrence and exceptions;
/// trips refer to it by id only.
#[derive(Clone, Debug, PartialEq)]
pub struct Service {
    pub id: String,
    /// absent when the service is defined by calendar_dates.txt alone
    pub pattern: Option<CalendarPattern>,
    pub exceptions: HashMap<NaiveDate, Exception>,
}

impl Service {
    /// a service with a weekly recurrence and no exceptions.
    pub fn weekly(id: String, pattern: CalendarPattern) -> Service {
        Service {
            id,
            pattern: Some(pattern),
            exceptions: HashMap::new(),
        }
    }

    /// a service with neither a recurrence nor exceptions, which never runs
    /// until exceptions are added.
    pub fn exceptions_only(id: String) -> Service {
        Service {
            id,
            pattern: None,
            exceptions: HashMap::new(),
        }
    }

    pub fn is_active_on(&self, date: &NaiveDate) -> bool {
        activation_ops::is_active_on(self, date)
    }

    /// records an exception for this service. a later exception for the
    /// same date replaces the earlier one.
    pub fn add_exception(&mut self, calendar_date: &CalendarDate) -> Option<Exception> {
        self.exceptions
            .insert(calendar_date.date, calendar_date.exception_type)
    }

    /// the calendar.txt row for this service, if it has a weekly recurrence.
    pub fn to_calendar(&self) -> Option<Calendar> {
        self.pattern.as_ref().map(|p| {
            let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = p.days.0;
            Calendar {
                id: self.id.clone(),
                monday,
                tuesday,
                wednesday,
                thursday,
                friday,
                saturday,
                sunday,
                start_date: p.start_date,
                end_date: p.end_date,
            }
        })
    }

    /// the calendar_dates.txt rows for this service, sorted by date.
    pub fn to_calendar_dates(&self) -> Vec<CalendarDate> {
        self.exceptions
            .iter()
            .sorted_by_key(|(date, _)| **date)
            .map(|(date, exception_type)| CalendarDate {
                service_id: self.id.clone(),
                date: *date,
                exception_type: *exception_type,
            })
            .collect_vec()
    }
}

impl From<&Calendar> for Service {
    fn from(calendar: &Calendar) -> Self {
        Service::weekly(calendar.id.clone(), CalendarPattern::from(calendar))
    }
}

#[cfg(test)]
mod test {
    use super::{CalendarPattern, Service};
    use crate::calendar::WeekdayFlags;
    use chrono::NaiveDate;
    use gtfs_structures::{CalendarDate, Exception};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_to_calendar_carries_pattern() {
        let pattern = CalendarPattern {
            days: WeekdayFlags::from_code("MWF").expect("valid code"),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 30),
        };
        let service = Service::weekly(String::from("MWF"), pattern);
        let calendar = service.to_calendar().expect("weekly service has a calendar");
        assert_eq!(calendar.id, "MWF");
        assert!(calendar.monday && calendar.wednesday && calendar.friday);
        assert!(!calendar.tuesday && !calendar.thursday);
        assert!(!calendar.saturday && !calendar.sunday);
        assert_eq!(calendar.start_date, date(2024, 1, 1));
        assert_eq!(calendar.end_date, date(2024, 6, 30));
    }

    #[test]
    fn test_exceptions_only_service_has_no_calendar() {
        let mut service = Service::exceptions_only(String::from("HOLIDAY"));
        service.add_exception(&CalendarDate {
            service_id: String::from("HOLIDAY"),
            date: date(2024, 12, 25),
            exception_type: Exception::Added,
        });
        service.add_exception(&CalendarDate {
            service_id: String::from("HOLIDAY"),
            date: date(2024, 1, 1),
            exception_type: Exception::Added,
        });
        assert!(service.to_calendar().is_none());
        let dates = service
            .to_calendar_dates()
            .into_iter()
            .map(|cd| cd.date)
            .collect::<Vec<_>>();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 12, 25)]);
    }
}
