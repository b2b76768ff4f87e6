pub mod activation_ops;
mod calendar_error;
mod calendar_extractor;
mod extraction_summary;
mod service;
mod weekday_flags;

pub use calendar_error::CalendarError;
pub use calendar_extractor::{extract, CalendarExtractor, ExtractionRequest};
pub use extraction_summary::ExtractionSummary;
pub use service::{CalendarPattern, Service};
pub use weekday_flags::{WeekdayFlags, WEEKDAY_CODES};
