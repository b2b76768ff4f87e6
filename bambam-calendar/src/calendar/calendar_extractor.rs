use std::collections::HashSet;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{
        activation_ops, CalendarError, CalendarPattern, ExtractionSummary, Service, WeekdayFlags,
    },
    feed::FeedStore,
};

/// describes one prototype day to extract: the services running on
/// `prototype_date` are replaced by a single weekly calendar running on
/// `days` between `start_date` and `end_date` inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub prototype_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: WeekdayFlags,
}

impl ExtractionRequest {
    pub fn new(
        prototype_date: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days: WeekdayFlags,
    ) -> Result<ExtractionRequest, CalendarError> {
        let request = ExtractionRequest {
            prototype_date,
            start_date,
            end_date,
            days,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.end_date < self.start_date {
            return Err(CalendarError::InvalidDateRange {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(())
    }

    /// the id of the service synthesized for this request, which is the
    /// weekday code of the requested days.
    pub fn calendar_id(&self) -> String {
        self.days.code()
    }

    fn calendar(&self) -> Service {
        Service::weekly(
            self.calendar_id(),
            CalendarPattern {
                days: self.days,
                start_date: self.start_date,
                end_date: self.end_date,
            },
        )
    }
}

/// extracts the services of a prototype day from a feed and turns them into
/// one weekly calendar.
///
/// extraction is staged: [`CalendarExtractor::extract_calendar`] only reads
/// the feed and records which services to keep, and
/// [`CalendarExtractor::apply`] rewrites the feed in one pass per collection.
/// a rejected extraction leaves the feed and the staged plan as they were.
pub struct CalendarExtractor<'a, S: FeedStore + ?Sized> {
    feed: &'a mut S,
    staged: Option<StagedCalendar>,
}

/// the synthesized calendar of one prototype day and the ids of the services
/// merged into it.
struct StagedCalendar {
    prototype_date: NaiveDate,
    calendar: Service,
    retained: HashSet<String>,
}

impl<'a, S: FeedStore + ?Sized> CalendarExtractor<'a, S> {
    pub fn new(feed: &'a mut S) -> CalendarExtractor<'a, S> {
        CalendarExtractor { feed, staged: None }
    }

    pub fn feed(&self) -> &S {
        &*self.feed
    }

    /// the synthesized calendar, once a prototype day has been staged.
    pub fn calendar(&self) -> Option<&Service> {
        self.staged.as_ref().map(|staged| &staged.calendar)
    }

    /// stages a calendar for the services active on the request's prototype
    /// date, returning their ids. finding no active service is not an error;
    /// the calendar is still created and will own no trips.
    ///
    /// only one prototype day can be extracted into a feed. staging a second
    /// one fails with [`CalendarError::MultiplePrototypeDays`].
    pub fn extract_calendar(
        &mut self,
        request: &ExtractionRequest,
    ) -> Result<Vec<String>, CalendarError> {
        if let Some(staged) = self.staged.as_ref() {
            return Err(CalendarError::MultiplePrototypeDays {
                staged: staged.calendar.id.clone(),
                prototype_date: staged.prototype_date,
            });
        }
        request.validate()?;
        let calendar_id = request.calendar_id();
        let active = activation_ops::active_service_ids(&*self.feed, &request.prototype_date);

        if active.is_empty() {
            log::warn!(
                "no services run on {}, calendar '{}' will have no trips",
                request.prototype_date,
                calendar_id
            );
        } else {
            log::info!(
                "{} services run on {}: {}",
                active.len(),
                request.prototype_date,
                active.iter().join(", ")
            );
        }
        log::debug!("services move to calendar '{calendar_id}'");
        self.staged = Some(StagedCalendar {
            prototype_date: request.prototype_date,
            calendar: request.calendar(),
            retained: active.iter().cloned().collect(),
        });
        Ok(active)
    }

    /// replaces all services in the feed with the staged calendar, moves the
    /// trips of retained services onto it, and removes all other trips along
    /// with their stop times.
    ///
    /// trips are visited once to collect the removed trip ids, then stop times
    /// are filtered once against that set.
    pub fn apply(self) -> Result<ExtractionSummary, CalendarError> {
        let CalendarExtractor { feed, staged } = self;
        let StagedCalendar {
            calendar, retained, ..
        } = staged.ok_or(CalendarError::NothingStaged)?;

        let n_services = feed.service_count();
        let calendar_id = calendar.id.clone();
        feed.replace_services(vec![calendar]);

        let mut removed_trips: HashSet<String> = HashSet::new();
        feed.retain_trips(&mut |trip| {
            if retained.contains(&trip.service_id) {
                trip.service_id.clone_from(&calendar_id);
                true
            } else {
                removed_trips.insert(trip.id.clone());
                false
            }
        });

        let n_stop_times = feed.stop_time_count();
        feed.retain_stop_times(&mut |(trip_id, _)| !removed_trips.contains(trip_id));

        let summary = ExtractionSummary {
            services: vec![calendar_id],
            retained_services: retained.len(),
            discarded_services: n_services.saturating_sub(retained.len()),
            retained_trips: feed.trip_count(),
            removed_trips: removed_trips.len(),
            retained_stop_times: feed.stop_time_count(),
            removed_stop_times: n_stop_times - feed.stop_time_count(),
        };
        log::info!("{summary}");
        Ok(summary)
    }
}

/// collapses the services active on one prototype day into a single weekly
/// calendar and drops everything else from the feed.
pub fn extract<S: FeedStore + ?Sized>(
    feed: &mut S,
    request: &ExtractionRequest,
) -> Result<ExtractionSummary, CalendarError> {
    let mut extractor = CalendarExtractor::new(feed);
    extractor.extract_calendar(request)?;
    extractor.apply()
}
