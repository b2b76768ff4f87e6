use std::path::Path;

use gtfs_structures::RawGtfs;

use crate::feed::{Feed, FeedError, FeedStore};

/// loads the services, trips and stop times of a GTFS archive (zip file or
/// directory). trips.txt and stop_times.txt are required, calendar.txt and
/// calendar_dates.txt are each optional.
///
/// dangling references between the loaded collections are logged but do not
/// fail the read.
pub fn read_feed(input: &Path) -> Result<Feed, FeedError> {
    if !input.exists() {
        return Err(FeedError::MissingInput(input.display().to_string()));
    }
    let input_str = input
        .to_str()
        .ok_or_else(|| FeedError::InvalidPath(input.display().to_string()))?;

    log::info!("reading GTFS feed {input_str}");
    let raw = RawGtfs::new(input_str)?;
    let calendars = raw.calendar.transpose()?.unwrap_or_default();
    let calendar_dates = raw.calendar_dates.transpose()?.unwrap_or_default();
    let trips = raw.trips?;
    let stop_times = raw.stop_times?;
    log::debug!(
        "read {} calendar rows, {} calendar_dates rows, {} trips, {} stop times",
        calendars.len(),
        calendar_dates.len(),
        trips.len(),
        stop_times.len()
    );

    let feed = Feed::from_records(calendars, calendar_dates, trips, stop_times);
    for msg in feed.reference_errors() {
        log::warn!("{msg}");
    }
    log::info!(
        "loaded {} services, {} trips, {} stop times",
        feed.service_count(),
        feed.trip_count(),
        feed.stop_time_count()
    );
    Ok(feed)
}
