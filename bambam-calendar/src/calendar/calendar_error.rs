use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum CalendarError {
    #[error("Invalid weekday code '{0}', expected letters from MTWRFSU, each at most once and in that order")]
    InvalidWeekdayCode(String),
    #[error("Invalid calendar date range: start date {start_date} is after end date {end_date}")]
    InvalidDateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("Calendar '{staged}' was already extracted from {prototype_date}, extracting more than one prototype day into a feed is not supported")]
    MultiplePrototypeDays {
        staged: String,
        prototype_date: NaiveDate,
    },
    #[error("No calendar has been extracted, refusing to clear all services")]
    NothingStaged,
}
