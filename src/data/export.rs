//! CSV export of the current window, derived columns included.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::model::Column;
use super::window::WindowView;

/// ISO-8601 layout used for the synthesized timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Write the window to a file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(view: &WindowView<'_>, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(view, io::BufWriter::new(file))
}

/// Write the window as CSV to any writer: a header row with every
/// [`Column`] name, then one row per reading in window order.
pub fn write_csv(view: &WindowView<'_>, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(Column::ALL.iter().map(|c| c.header()))?;

    for r in view.rows() {
        let mut record = Vec::with_capacity(Column::ALL.len());
        record.push(r.timestamp().format(TIMESTAMP_FORMAT).to_string());
        for col in &Column::ALL[1..] {
            record.push(r.value(*col).to_string());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
