use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, Float64Array};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::DataType;
use chrono::{NaiveDateTime, TimeDelta};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use zip::ZipArchive;

use super::error::DataError;
use super::model::{Column, SensorRow};
use crate::config::PlantConfig;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the plant's sensor rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`             – header row with the raw column names
/// * `.zip`             – the first `.csv` entry of the archive
/// * `.parquet` / `.pq` – flat numeric columns with the same names
///
/// Rows keep file order and receive synthesized timestamps
/// (`base_epoch + i * sample_interval_secs`).  A path that does not exist is
/// reported as [`DataError::MissingInputFile`] before anything is read.
pub fn load_file(path: &Path, config: &PlantConfig) -> Result<Vec<SensorRow>, DataError> {
    if !path.is_file() {
        return Err(DataError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(File::open(path)?, config)?,
        "zip" => load_zip(path, config)?,
        "parquet" | "pq" => load_parquet(path, config)?,
        other => {
            return Err(DataError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    log::info!("Read {} sensor rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Timestamp of row `index`.  Fails when the offset leaves the calendar
/// range `NaiveDateTime` can represent.
pub fn timestamp_at(config: &PlantConfig, index: usize) -> Result<NaiveDateTime, DataError> {
    i64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(i64::from(config.sample_interval_secs)))
        .and_then(TimeDelta::try_seconds)
        .and_then(|offset| config.base_epoch.checked_add_signed(offset))
        .ok_or(DataError::TimestampOverflow {
            row: index,
            interval_secs: config.sample_interval_secs,
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text from any reader.  Extra columns are ignored; header order
/// is free.  Empty cells read as NaN.
pub fn read_csv<R: Read>(source: R, config: &PlantConfig) -> Result<Vec<SensorRow>, DataError> {
    let mut reader = csv::Reader::from_reader(source);
    let mut found: [Option<usize>; 9] = [None; 9];
    for (idx, header) in reader.headers()?.iter().enumerate() {
        let Some(col) = Column::from_header(header.trim()) else {
            continue;
        };
        if let Some(slot) = Column::RAW.iter().position(|c| *c == col) {
            found[slot].get_or_insert(idx);
        }
    }

    let mut indices = [0usize; 9];
    for ((slot, idx), col) in indices.iter_mut().zip(found).zip(Column::RAW) {
        *slot = idx.ok_or(DataError::MissingColumn {
            column: col.header(),
        })?;
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let mut raw = [0.0f64; 9];
        for ((value, &idx), col) in raw.iter_mut().zip(indices.iter()).zip(Column::RAW) {
            *value = parse_cell(record.get(idx).unwrap_or(""), row_no, col)?;
        }
        rows.push(SensorRow::from_raw(timestamp_at(config, row_no)?, raw));
    }

    Ok(rows)
}

fn parse_cell(s: &str, row: usize, col: Column) -> Result<f64, DataError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| DataError::Parse {
        row,
        column: col.header(),
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Zip-wrapped CSV
// ---------------------------------------------------------------------------

fn load_zip(path: &Path, config: &PlantConfig) -> Result<Vec<SensorRow>, DataError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let is_csv = {
            let entry = archive.by_index(i)?;
            let name = entry.name().to_ascii_lowercase();
            entry.is_file() && name.ends_with(".csv") && !name.starts_with("__macosx/")
        };
        if is_csv {
            let entry = archive.by_index(i)?;
            log::debug!("Reading {} from {}", entry.name(), path.display());
            return read_csv(entry, config);
        }
    }

    Err(DataError::EmptyArchive {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns carry the raw header names.
///
/// Any numeric Arrow type is accepted and widened to `f64`; nulls read as NaN.
/// Non-numeric columns are rejected like unparsable CSV cells.
fn load_parquet(path: &Path, config: &PlantConfig) -> Result<Vec<SensorRow>, DataError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    // Values that fail to widen are errors, not nulls.
    let strict = CastOptions {
        safe: false,
        ..Default::default()
    };
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: Vec<Float64Array> = Vec::with_capacity(Column::RAW.len());
        for col in Column::RAW {
            let idx = schema
                .index_of(col.header())
                .map_err(|_| DataError::MissingColumn {
                    column: col.header(),
                })?;
            let source = batch.column(idx);
            if !source.data_type().is_numeric() {
                return Err(DataError::Parse {
                    row: rows.len(),
                    column: col.header(),
                    value: format!("{:?}", source.data_type()),
                });
            }
            let widened = cast_with_options(source, &DataType::Float64, &strict)?;
            let values = widened
                .as_any()
                .downcast_ref::<Float64Array>()
                .cloned()
                .ok_or(DataError::Parse {
                    row: rows.len(),
                    column: col.header(),
                    value: format!("{:?}", source.data_type()),
                })?;
            columns.push(values);
        }

        for row in 0..batch.num_rows() {
            let mut raw = [0.0f64; 9];
            for (value, array) in raw.iter_mut().zip(&columns) {
                *value = if array.is_null(row) {
                    f64::NAN
                } else {
                    array.value(row)
                };
            }
            let index = rows.len();
            rows.push(SensorRow::from_raw(timestamp_at(config, index)?, raw));
        }
    }

    Ok(rows)
}
