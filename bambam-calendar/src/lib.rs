//! GTFS calendar extraction for bambam transit modeling.
//!
//! collapses every service active on a prototype day into a single weekly
//! calendar over a new date range, dropping the trips and stop times of all
//! other services.
pub mod app;
pub mod calendar;
pub mod feed;
pub mod util;
