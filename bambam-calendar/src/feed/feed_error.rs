#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Input file {0} does not exist!")]
    MissingInput(String),
    #[error("Failed to parse gtfs bundle file into `RawGtfs` struct: {0}")]
    BundleReadError(#[from] gtfs_structures::Error),
    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(String),
    #[error("failed reading '{filepath}': {error}")]
    ReadError { filepath: String, error: String },
    #[error("failed writing '{filepath}': {error}")]
    WriteError { filepath: String, error: String },
    #[error("failed serializing {filename}: {error}")]
    CsvError { filename: String, error: String },
    #[error("Output {0} already exists and overwrite is disabled")]
    OutputExists(String),
}
