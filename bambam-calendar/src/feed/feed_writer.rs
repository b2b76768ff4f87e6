use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use clap::ValueEnum;
use itertools::Itertools;
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::feed::{FeedError, FeedStore};

pub const CALENDAR_FILENAME: &str = "calendar.txt";
pub const CALENDAR_DATES_FILENAME: &str = "calendar_dates.txt";
pub const TRIPS_FILENAME: &str = "trips.txt";
pub const STOP_TIMES_FILENAME: &str = "stop_times.txt";

/// GTFS files regenerated from the feed. all other files of the source archive
/// are copied to the output unchanged.
pub const FEED_FILENAMES: [&str; 4] = [
    CALENDAR_FILENAME,
    CALENDAR_DATES_FILENAME,
    TRIPS_FILENAME,
    STOP_TIMES_FILENAME,
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Zip,
    Directory,
}

impl OutputFormat {
    /// zip when the destination has a `.zip` extension, otherwise a directory.
    pub fn infer(destination: &Path) -> OutputFormat {
        match destination.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => OutputFormat::Zip,
            _ => OutputFormat::Directory,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WriteOptions {
    pub format: OutputFormat,
    pub overwrite: bool,
}

/// a named file to be written into the output archive.
type OutputFile = (String, Vec<u8>);

/// writes a GTFS archive at `destination` made of the feed's calendar, trips
/// and stop times plus every other file found in the `source` archive.
pub fn write_feed<S: FeedStore + ?Sized>(
    feed: &S,
    source: &Path,
    destination: &Path,
    options: &WriteOptions,
) -> Result<(), FeedError> {
    if destination.exists() && !options.overwrite {
        return Err(FeedError::OutputExists(destination.display().to_string()));
    }

    if is_same_path(source, destination) {
        log::warn!(
            "output {} is the input archive, it is replaced in place",
            destination.display()
        );
    }
    let mut files = read_passthrough_files(source)?;
    log::debug!(
        "passing through {} files from {}: {}",
        files.len(),
        source.display(),
        files.iter().map(|(name, _)| name).join(", ")
    );
    files.extend(serialize_feed(feed)?);

    log::info!(
        "writing GTFS feed to {} as {:?}",
        destination.display(),
        options.format
    );
    match options.format {
        OutputFormat::Zip => write_zip(destination, &files),
        OutputFormat::Directory => write_directory(destination, &files),
    }
}

/// serializes the collections held by the feed into GTFS csv files.
/// calendar_dates.txt is only produced when some service has exceptions.
fn serialize_feed<S: FeedStore + ?Sized>(feed: &S) -> Result<Vec<OutputFile>, FeedError> {
    let calendars = feed
        .services()
        .filter_map(|service| service.to_calendar())
        .collect_vec();
    let calendar_dates = feed
        .services()
        .flat_map(|service| service.to_calendar_dates())
        .collect_vec();

    let mut files = vec![(
        CALENDAR_FILENAME.to_string(),
        to_csv(CALENDAR_FILENAME, calendars.iter())?,
    )];
    if !calendar_dates.is_empty() {
        files.push((
            CALENDAR_DATES_FILENAME.to_string(),
            to_csv(CALENDAR_DATES_FILENAME, calendar_dates.iter())?,
        ));
    }
    files.push((
        TRIPS_FILENAME.to_string(),
        to_csv(TRIPS_FILENAME, feed.trips())?,
    ));
    let stop_times = tqdm!(
        feed.stop_times().map(|(_, stop_time)| stop_time),
        total = feed.stop_time_count(),
        desc = "write stop times"
    );
    files.push((
        STOP_TIMES_FILENAME.to_string(),
        to_csv(STOP_TIMES_FILENAME, stop_times)?,
    ));
    Ok(files)
}

fn to_csv<'a, T, I>(filename: &str, rows: I) -> Result<Vec<u8>, FeedError>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    let csv_error = |error: String| FeedError::CsvError {
        filename: filename.to_string(),
        error,
    };
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| csv_error(e.to_string()))
}

/// collects every file of the source archive that is not regenerated from the
/// feed. zip entries are flattened to their file names, matching how GTFS
/// readers accept archives with a single nested folder.
fn read_passthrough_files(source: &Path) -> Result<Vec<OutputFile>, FeedError> {
    let read_error = |error: String| FeedError::ReadError {
        filepath: source.display().to_string(),
        error,
    };
    let mut files: Vec<OutputFile> = vec![];
    if source.is_dir() {
        let entries = std::fs::read_dir(source).map_err(|e| read_error(e.to_string()))?;
        for entry in entries {
            let path = entry.map_err(|e| read_error(e.to_string()))?.path();
            let filename = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if path.is_file() => name.to_string(),
                _ => continue,
            };
            let bytes = std::fs::read(&path).map_err(|e| read_error(e.to_string()))?;
            files.push((filename, bytes));
        }
    } else {
        let file = File::open(source).map_err(|e| read_error(e.to_string()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| read_error(e.to_string()))?;
        for idx in 0..archive.len() {
            let mut entry = archive
                .by_index(idx)
                .map_err(|e| read_error(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let filename = match Path::new(entry.name()).file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let mut bytes = vec![];
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| read_error(e.to_string()))?;
            files.push((filename, bytes));
        }
    }

    let passthrough = files
        .into_iter()
        .filter(|(name, _)| !FEED_FILENAMES.contains(&name.as_str()))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect_vec();
    Ok(passthrough)
}

fn write_zip(destination: &Path, files: &[OutputFile]) -> Result<(), FeedError> {
    let write_error = |error: String| FeedError::WriteError {
        filepath: destination.display().to_string(),
        error,
    };
    let file = File::create(destination).map_err(|e| write_error(e.to_string()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (filename, bytes) in files.iter() {
        zip.start_file(filename.as_str(), options)
            .map_err(|e| write_error(format!("{filename}: {e}")))?;
        zip.write_all(bytes)
            .map_err(|e| write_error(format!("{filename}: {e}")))?;
    }
    zip.finish().map_err(|e| write_error(e.to_string()))?;
    Ok(())
}

/// writes the files into the destination directory. regenerated GTFS files
/// left in the directory by an earlier feed are removed first, so a table the
/// feed no longer produces does not survive into the output.
fn write_directory(destination: &Path, files: &[OutputFile]) -> Result<(), FeedError> {
    let write_error = |error: String| FeedError::WriteError {
        filepath: destination.display().to_string(),
        error,
    };
    std::fs::create_dir_all(destination).map_err(|e| write_error(e.to_string()))?;
    for filename in FEED_FILENAMES.iter() {
        let stale = destination.join(filename);
        if stale.is_file() {
            log::debug!("removing stale {}", stale.display());
            std::fs::remove_file(&stale).map_err(|e| write_error(format!("{filename}: {e}")))?;
        }
    }
    for (filename, bytes) in files.iter() {
        std::fs::write(destination.join(filename), bytes)
            .map_err(|e| write_error(format!("{filename}: {e}")))?;
    }
    Ok(())
}

fn is_same_path(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
