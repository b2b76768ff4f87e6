use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// counts describing the effect of applying calendar extraction to a feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// ids of the synthesized services, which are the only services left
    pub services: Vec<String>,
    pub retained_services: usize,
    pub discarded_services: usize,
    pub retained_trips: usize,
    pub removed_trips: usize,
    pub retained_stop_times: usize,
    pub removed_stop_times: usize,
}

impl Display for ExtractionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "calendars [{}] from {} services ({} discarded), {} trips kept ({} removed), {} stop times kept ({} removed)",
            self.services.join(","),
            self.retained_services,
            self.discarded_services,
            self.retained_trips,
            self.removed_trips,
            self.retained_stop_times,
            self.removed_stop_times
        )
    }
}
