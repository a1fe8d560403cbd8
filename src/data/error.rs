use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a file path and a windowed view.
///
/// All variants are recoverable: the UI reports them and keeps running.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(
        "input file not found: {}. Pass the plant data file on the command line \
         or open it with File → Open…",
        path.display()
    )]
    MissingInputFile { path: PathBuf },

    #[error("invalid row range [{start}, {end}) for a table of {len} rows")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error(
        "row {row} has no representable timestamp at a {interval_secs} s sample interval"
    )]
    TimestampOverflow { row: usize, interval_secs: u32 },

    #[error("dataset is empty: summary statistics are undefined for zero rows")]
    EmptyDataset,

    #[error("column '{column}' has no numeric values to average")]
    NoFiniteValues { column: &'static str },

    #[error("input is missing the '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("zip archive {} holds no .csv entry", path.display())]
    EmptyArchive { path: PathBuf },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
