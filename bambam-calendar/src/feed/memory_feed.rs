use std::collections::BTreeMap;

use gtfs_structures::{Calendar, CalendarDate, RawStopTime, RawTrip};
use kdam::tqdm;

use crate::{
    calendar::Service,
    feed::{FeedStore, StopTimeKey},
};

/// in-memory GTFS feed holding the collections that calendar extraction reads
/// and rewrites: services, trips and stop times, each keyed by its identifier.
#[derive(Debug, Default)]
pub struct Feed {
    services: BTreeMap<String, Service>,
    trips: BTreeMap<String, RawTrip>,
    stop_times: BTreeMap<StopTimeKey, RawStopTime>,
}

impl Feed {
    /// builds a feed from raw GTFS rows. calendar.txt and calendar_dates.txt
    /// rows sharing a service_id are merged into one [`Service`]. on duplicate
    /// keys the later row wins.
    pub fn from_records(
        calendars: Vec<Calendar>,
        calendar_dates: Vec<CalendarDate>,
        trips: Vec<RawTrip>,
        stop_times: Vec<RawStopTime>,
    ) -> Feed {
        let mut services: BTreeMap<String, Service> = BTreeMap::new();
        for calendar in calendars.iter() {
            if services
                .insert(calendar.id.clone(), Service::from(calendar))
                .is_some()
            {
                log::warn!("duplicate calendar.txt entry for service_id '{}'", calendar.id);
            }
        }
        for calendar_date in calendar_dates.iter() {
            let service = services
                .entry(calendar_date.service_id.clone())
                .or_insert_with(|| Service::exceptions_only(calendar_date.service_id.clone()));
            if service.add_exception(calendar_date).is_some() {
                log::warn!(
                    "duplicate calendar_dates.txt entry for service_id '{}' on {}",
                    calendar_date.service_id,
                    calendar_date.date
                );
            }
        }

        let mut trips_by_id: BTreeMap<String, RawTrip> = BTreeMap::new();
        for trip in trips.into_iter() {
            if let Some(prev) = trips_by_id.insert(trip.id.clone(), trip) {
                log::warn!("duplicate trips.txt entry for trip_id '{}'", prev.id);
            }
        }

        let n_stop_times = stop_times.len();
        let mut stop_times_by_key: BTreeMap<StopTimeKey, RawStopTime> = BTreeMap::new();
        for stop_time in tqdm!(
            stop_times.into_iter(),
            total = n_stop_times,
            desc = "index stop times"
        ) {
            let key = (stop_time.trip_id.clone(), stop_time.stop_sequence);
            if let Some(prev) = stop_times_by_key.insert(key, stop_time) {
                log::warn!(
                    "duplicate stop_times.txt entry for trip_id '{}' at stop_sequence {}",
                    prev.trip_id,
                    prev.stop_sequence
                );
            }
        }

        Feed {
            services,
            trips: trips_by_id,
            stop_times: stop_times_by_key,
        }
    }

    /// describes every trip whose service_id has no service, and every stop
    /// time whose trip_id has no trip. an empty result means the feed is
    /// referentially consistent.
    pub fn reference_errors(&self) -> Vec<String> {
        let dangling_trips = self
            .trips
            .values()
            .filter(|trip| !self.services.contains_key(&trip.service_id))
            .map(|trip| {
                format!(
                    "trip '{}' references missing service '{}'",
                    trip.id, trip.service_id
                )
            });
        let dangling_stop_times = self
            .stop_times
            .keys()
            .filter(|(trip_id, _)| !self.trips.contains_key(trip_id))
            .map(|(trip_id, seq)| {
                format!("stop time ({trip_id}, {seq}) references missing trip '{trip_id}'")
            });
        dangling_trips.chain(dangling_stop_times).collect()
    }
}

impl FeedStore for Feed {
    fn services(&self) -> Box<dyn Iterator<Item = &Service> + '_> {
        Box::new(self.services.values())
    }

    fn trips(&self) -> Box<dyn Iterator<Item = &RawTrip> + '_> {
        Box::new(self.trips.values())
    }

    fn stop_times(&self) -> Box<dyn Iterator<Item = (&StopTimeKey, &RawStopTime)> + '_> {
        Box::new(self.stop_times.iter())
    }

    fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.get(service_id)
    }

    fn trip(&self, trip_id: &str) -> Option<&RawTrip> {
        self.trips.get(trip_id)
    }

    fn service_count(&self) -> usize {
        self.services.len()
    }

    fn trip_count(&self) -> usize {
        self.trips.len()
    }

    fn stop_time_count(&self) -> usize {
        self.stop_times.len()
    }

    fn replace_services(&mut self, services: Vec<Service>) {
        self.services.clear();
        for service in services.into_iter() {
            self.services.insert(service.id.clone(), service);
        }
    }

    fn retain_trips(&mut self, keep: &mut dyn FnMut(&mut RawTrip) -> bool) {
        self.trips.retain(|_, trip| keep(trip));
    }

    fn retain_stop_times(&mut self, keep: &mut dyn FnMut(&StopTimeKey) -> bool) {
        self.stop_times.retain(|key, _| keep(key));
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::Feed;
    use crate::feed::FeedStore;
    use gtfs_structures::{Calendar, CalendarDate, RawStopTime, RawTrip};
    use serde::de::DeserializeOwned;

    /// reads csv text into GTFS rows the same way a GTFS archive is parsed.
    pub(crate) fn rows<T: DeserializeOwned>(csv_text: &str) -> Vec<T> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes())
            .into_deserialize::<T>()
            .collect::<Result<Vec<T>, _>>()
            .unwrap_or_else(|e| panic!("failed reading test rows: {e}"))
    }

    /// the fixture archive under `test/weekday-weekend`: services WD (Mon-Fri)
    /// and WE (Sat-Sun) over 2024, plus HOL defined by calendar_dates.txt
    /// alone. on Wednesday 2024-01-10 WD is removed and HOL is added.
    pub(crate) fn weekday_weekend_feed() -> Feed {
        let calendars: Vec<Calendar> =
            rows(include_str!("../../test/weekday-weekend/calendar.txt"));
        let calendar_dates: Vec<CalendarDate> =
            rows(include_str!("../../test/weekday-weekend/calendar_dates.txt"));
        let trips: Vec<RawTrip> = rows(include_str!("../../test/weekday-weekend/trips.txt"));
        let stop_times: Vec<RawStopTime> =
            rows(include_str!("../../test/weekday-weekend/stop_times.txt"));
        Feed::from_records(calendars, calendar_dates, trips, stop_times)
    }

    #[test]
    fn test_from_records_merges_calendar_and_dates() {
        let feed = weekday_weekend_feed();
        assert_eq!(feed.service_count(), 3);
        assert_eq!(feed.trip_count(), 5);
        assert_eq!(feed.stop_time_count(), 13);
        let wd = feed.service("WD").expect("WD loaded");
        assert!(wd.pattern.is_some());
        assert_eq!(wd.exceptions.len(), 1);
        let hol = feed.service("HOL").expect("HOL loaded");
        assert!(hol.pattern.is_none());
        assert_eq!(hol.exceptions.len(), 1);
        assert!(feed.reference_errors().is_empty());
    }

    #[test]
    fn test_stop_times_ordered_by_trip_and_sequence() {
        let feed = weekday_weekend_feed();
        let keys = feed
            .stop_times()
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_reference_errors_report_dangling_rows() {
        let trips: Vec<RawTrip> = rows(
            "route_id,service_id,trip_id
            r1,MISSING,t1",
        );
        let stop_times: Vec<RawStopTime> = rows(
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence
            t1,08:00:00,08:00:00,s1,1
            ghost,08:00:00,08:00:00,s1,1",
        );
        let feed = Feed::from_records(vec![], vec![], trips, stop_times);
        let errors = feed.reference_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("MISSING"));
        assert!(errors[1].contains("ghost"));
    }

    #[test]
    fn test_bulk_mutation() {
        let mut feed = weekday_weekend_feed();
        feed.replace_services(vec![]);
        assert_eq!(feed.service_count(), 0);
        feed.retain_trips(&mut |trip| trip.service_id == "WD");
        assert_eq!(feed.trip_count(), 2);
        feed.retain_stop_times(&mut |(trip_id, _)| trip_id.starts_with("wd"));
        assert_eq!(feed.stop_time_count(), 6);
    }
}
