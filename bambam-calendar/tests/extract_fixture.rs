use std::path::{Path, PathBuf};

use bambam_calendar::{
    app::CalendarApp,
    feed::{read_feed, FeedStore},
};
use clap::Parser;
use gtfs_structures::RawGtfs;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test")
        .join("weekday-weekend")
}

/// temporary output location, removed when dropped so a failing test leaves
/// nothing behind.
struct ScratchPath(PathBuf);

impl ScratchPath {
    fn new(name: &str) -> ScratchPath {
        let path =
            std::env::temp_dir().join(format!("bambam-calendar-{}-{name}", std::process::id()));
        let scratch = ScratchPath(path);
        scratch.remove();
        scratch
    }

    fn remove(&self) {
        if self.0.is_dir() {
            let _ = std::fs::remove_dir_all(&self.0);
        } else if self.0.exists() {
            let _ = std::fs::remove_file(&self.0);
        }
    }
}

impl Drop for ScratchPath {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::ops::Deref for ScratchPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

fn app(prototype_date: &str, days: &str, output: &Path) -> CalendarApp {
    app_with_input(prototype_date, days, &fixture(), output)
}

fn app_with_input(prototype_date: &str, days: &str, input: &Path, output: &Path) -> CalendarApp {
    CalendarApp::try_parse_from([
        "bambam_calendar",
        prototype_date,
        days,
        "2024-01-01",
        "2024-12-31",
        input.to_str().expect("utf-8 input path"),
        output.to_str().expect("utf-8 output path"),
    ])
    .unwrap_or_else(|e| panic!("failed parsing test arguments: {e}"))
}

#[test]
fn test_extract_weekday_to_zip() {
    let output = ScratchPath::new("weekday.zip");
    let summary = app("2024-01-03", "MTWRF", &output)
        .run()
        .expect("extraction should succeed");
    assert_eq!(summary.services, vec!["MTWRF"]);
    assert_eq!(summary.removed_trips, 3);

    let feed = read_feed(&output).expect("output should be a readable GTFS archive");
    let services = feed.services().map(|s| s.id.clone()).collect::<Vec<_>>();
    assert_eq!(services, vec!["MTWRF"]);
    let trips = feed.trips().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(trips, vec!["wd1", "wd2"]);
    assert!(feed.trips().all(|t| t.service_id == "MTWRF"));
    assert_eq!(feed.stop_time_count(), 6);
    assert!(feed.reference_errors().is_empty());

    // files not owned by the extraction are carried over
    let raw = RawGtfs::new(output.to_str().expect("utf-8 output path"))
        .expect("output should parse");
    assert_eq!(raw.stops.as_ref().map(|s| s.len()).ok(), Some(3));
    assert_eq!(raw.routes.as_ref().map(|r| r.len()).ok(), Some(2));
    assert_eq!(raw.agencies.as_ref().map(|a| a.len()).ok(), Some(1));
    assert!(raw.calendar_dates.is_none());

}

#[test]
fn test_extract_weekend_to_directory() {
    let output = ScratchPath::new("weekend");
    // 2024-01-06 is a Saturday
    app("2024-01-06", "SU", &output)
        .run()
        .expect("extraction should succeed");
    assert!(output.join("stops.txt").is_file());
    assert!(!output.join("calendar_dates.txt").exists());

    let feed = read_feed(&output).expect("output should be a readable GTFS archive");
    let trips = feed.trips().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(trips, vec!["we1", "we2"]);
    assert!(feed.service("SU").is_some());
    assert_eq!(feed.stop_time_count(), 4);
    assert!(feed.reference_errors().is_empty());

}

#[test]
fn test_missing_input_writes_nothing() {
    let output = ScratchPath::new("missing-input.zip");
    let mut app = app("2024-01-03", "MTWRF", &output);
    app.input = fixture().join("not-a-feed.zip");
    assert!(app.run().is_err());
    assert!(!output.exists());
}

#[test]
fn test_inverted_date_range_writes_nothing() {
    let output = ScratchPath::new("inverted.zip");
    let input = fixture();
    let app = CalendarApp::try_parse_from([
        "bambam_calendar",
        "2024-01-03",
        "MTWRF",
        "2024-12-31",
        "2024-01-01",
        input.to_str().expect("utf-8 fixture path"),
        output.to_str().expect("utf-8 output path"),
    ])
    .expect("arguments should parse");
    assert!(app.run().is_err());
    assert!(!output.exists());
}

#[test]
fn test_extract_in_place_leaves_a_single_service() {
    let work = ScratchPath::new("in-place");
    std::fs::create_dir_all(&*work).expect("create scratch directory");
    for entry in std::fs::read_dir(fixture()).expect("read fixture directory") {
        let path = entry.expect("fixture entry").path();
        let filename = path.file_name().expect("fixture file name");
        std::fs::copy(&path, work.join(filename)).expect("copy fixture file");
    }
    assert!(work.join("calendar_dates.txt").is_file());

    app_with_input("2024-01-03", "MTWRF", &work, &work)
        .run()
        .expect("extraction should succeed");

    assert!(!work.join("calendar_dates.txt").exists());
    assert!(work.join("stops.txt").is_file());
    let feed = read_feed(&work).expect("output should be a readable GTFS archive");
    let services = feed.services().map(|s| s.id.clone()).collect::<Vec<_>>();
    assert_eq!(services, vec!["MTWRF"]);
    let trips = feed.trips().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(trips, vec!["wd1", "wd2"]);
    assert!(feed.reference_errors().is_empty());
}

#[test]
fn test_rerun_into_existing_directory_drops_stale_tables() {
    let output = ScratchPath::new("rerun");
    std::fs::create_dir_all(&*output).expect("create scratch directory");
    std::fs::copy(
        fixture().join("calendar_dates.txt"),
        output.join("calendar_dates.txt"),
    )
    .expect("seed stale calendar_dates.txt");

    app("2024-01-06", "SU", &output)
        .run()
        .expect("extraction should succeed");

    let feed = read_feed(&output).expect("output should be a readable GTFS archive");
    let services = feed.services().map(|s| s.id.clone()).collect::<Vec<_>>();
    assert_eq!(services, vec!["SU"]);
}
