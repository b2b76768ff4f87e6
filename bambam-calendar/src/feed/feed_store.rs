use gtfs_structures::{RawStopTime, RawTrip};

use crate::calendar::Service;

/// composite identifier of a stop time: (trip_id, stop_sequence).
pub type StopTimeKey = (String, u32);

/// keyed storage of the three GTFS collections touched by calendar extraction.
///
/// mutation is only offered in bulk: clearing and re-inserting the service
/// collection, and one filtering pass over trips or stop times. backing
/// stores may be slow at deleting individual records, so callers collect
/// what they want to discard first and then filter each collection once.
pub trait FeedStore {
    fn services(&self) -> Box<dyn Iterator<Item = &Service> + '_>;

    fn trips(&self) -> Box<dyn Iterator<Item = &RawTrip> + '_>;

    /// stop times in (trip_id, stop_sequence) order.
    fn stop_times(&self) -> Box<dyn Iterator<Item = (&StopTimeKey, &RawStopTime)> + '_>;

    fn service(&self, service_id: &str) -> Option<&Service>;

    fn trip(&self, trip_id: &str) -> Option<&RawTrip>;

    fn service_count(&self) -> usize;

    fn trip_count(&self) -> usize;

    fn stop_time_count(&self) -> usize;

    /// removes every service and inserts exactly the given ones.
    fn replace_services(&mut self, services: Vec<Service>);

    /// visits every trip once. trips may be modified in place; those for
    /// which `keep` returns false are removed.
    fn retain_trips(&mut self, keep: &mut dyn FnMut(&mut RawTrip) -> bool);

    /// visits every stop time key once, removing those for which `keep`
    /// returns false.
    fn retain_stop_times(&mut self, keep: &mut dyn FnMut(&StopTimeKey) -> bool);
}
