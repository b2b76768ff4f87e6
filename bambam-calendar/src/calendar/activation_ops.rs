use chrono::NaiveDate;
use gtfs_structures::Exception;
use itertools::Itertools;

use crate::{calendar::Service, feed::FeedStore};

/// uses the calendar.txt and calendar_dates.txt entries of a service to test if
/// it runs on the given date.
///
/// an exception (calendar_dates.txt) on the date always wins. otherwise the
/// weekly recurrence (calendar.txt) decides, but only within its inclusive
/// date range. a service with neither is never active.
pub fn is_active_on(service: &Service, date: &NaiveDate) -> bool {
    match (service.exceptions.get(date), &service.pattern) {
        (Some(Exception::Added), _) => true,
        (Some(Exception::Deleted), _) => false,
        (None, Some(pattern)) => pattern.contains(date) && pattern.days.runs_on_date(date),
        (None, None) => false,
    }
}

/// ids of all services in the store that run on the given date, in id order.
pub fn active_service_ids<S: FeedStore + ?Sized>(store: &S, date: &NaiveDate) -> Vec<String> {
    store
        .services()
        .filter(|service| is_active_on(service, date))
        .map(|service| service.id.clone())
        .sorted()
        .collect_vec()
}
