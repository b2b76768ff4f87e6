use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    app::{CalendarAppConfig, CalendarAppError},
    calendar::{extract, ExtractionRequest, ExtractionSummary, WeekdayFlags},
    feed::{read_feed, write_feed, FeedError, OutputFormat, WriteOptions},
    util::date_codec::app::parse_naive_date,
};

const LONG_ABOUT: &str = "Convert calendar_dates from prototype days into calendars.

Specify a prototype day and the first letter of the days on which you want a \
calendar based on that day to run. Every service active on the prototype day \
is replaced by one calendar running on those days between the start and end \
date. Trips and stop times of all other services are removed.

Dates are specified as YYYY-MM-DD.
Service days are specified using the following acronyms:
  M - Monday
  T - Tuesday
  W - Wednesday
  R - Thursday
  F - Friday
  S - Saturday
  U - Sunday
Days must be specified in this order.";

/// command line tool for extracting the service of a prototype day from a GTFS
/// archive into a weekly calendar
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct CalendarApp {
    /// day whose active services are extracted (YYYY-MM-DD)
    #[arg(value_parser = parse_naive_date)]
    pub prototype_date: NaiveDate,
    /// days on which the new calendar runs, from MTWRFSU in that order
    #[arg(value_parser = WeekdayFlags::from_code)]
    pub days: WeekdayFlags,
    /// first day of the new calendar (YYYY-MM-DD)
    #[arg(value_parser = parse_naive_date)]
    pub start_date: NaiveDate,
    /// last day of the new calendar, inclusive (YYYY-MM-DD)
    #[arg(value_parser = parse_naive_date)]
    pub end_date: NaiveDate,
    /// GTFS archive to read, as a zip file or directory
    pub input: PathBuf,
    /// GTFS archive to write
    pub output: PathBuf,
    /// TOML file with output options
    #[arg(long)]
    pub config: Option<String>,
    /// write the extraction summary to this JSON file
    #[arg(long)]
    pub summary_file: Option<PathBuf>,
    /// overrides the configured or inferred output format
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,
}

impl CalendarApp {
    /// validates all arguments, then reads the input feed, extracts the
    /// prototype day and writes the result. nothing is written unless every
    /// step before it succeeded.
    pub fn run(&self) -> Result<ExtractionSummary, CalendarAppError> {
        let config = CalendarAppConfig::load(self.config.as_deref())?;
        let request = ExtractionRequest::new(
            self.prototype_date,
            self.start_date,
            self.end_date,
            self.days,
        )?;
        if request.days.is_empty() {
            log::warn!("no service days given, the extracted calendar will never run");
        }
        if !self.input.exists() {
            return Err(FeedError::MissingInput(self.input.display().to_string()).into());
        }
        if self.output.exists() && !config.overwrite {
            return Err(FeedError::OutputExists(self.output.display().to_string()).into());
        }
        let options = WriteOptions {
            format: self
                .output_format
                .or(config.output_format)
                .unwrap_or_else(|| OutputFormat::infer(&self.output)),
            overwrite: config.overwrite,
        };

        let mut feed = read_feed(&self.input)?;
        let summary = extract(&mut feed, &request)?;
        write_feed(&feed, &self.input, &self.output, &options)?;

        if let Some(summary_file) = self.summary_file.as_ref().or(config.summary_file.as_ref()) {
            write_summary(&summary, summary_file)?;
        }
        Ok(summary)
    }
}

fn write_summary(summary: &ExtractionSummary, summary_file: &Path) -> Result<(), CalendarAppError> {
    let summary_error = |error: String| CalendarAppError::SummaryWriteError {
        filepath: summary_file.display().to_string(),
        error,
    };
    let json = serde_json::to_string_pretty(summary).map_err(|e| summary_error(e.to_string()))?;
    std::fs::write(summary_file, json).map_err(|e| summary_error(e.to_string()))?;
    log::info!("wrote extraction summary to {}", summary_file.display());
    Ok(())
}
