use crate::{calendar::CalendarError, feed::FeedError};

#[derive(thiserror::Error, Debug)]
pub enum CalendarAppError {
    #[error(transparent)]
    CalendarError(#[from] CalendarError),
    #[error(transparent)]
    FeedError(#[from] FeedError),
    #[error("{msg}: {source}")]
    ConfigReadError {
        msg: String,
        source: config::ConfigError,
    },
    #[error("failed writing summary '{filepath}': {error}")]
    SummaryWriteError { filepath: String, error: String },
}
