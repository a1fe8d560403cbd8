use super::error::DataError;
use super::model::{Column, PlantDataset, Reading};

/// A borrowed, contiguous run of readings from a [`PlantDataset`].
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    rows: &'a [Reading],
    offset: usize,
}

impl<'a> WindowView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &'a [Reading] {
        self.rows
    }

    /// Half-open range of source indices covered by this view.
    pub fn source_range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.rows.len()
    }

    /// Iterate one column in row order.
    pub fn column(&self, column: Column) -> impl Iterator<Item = f64> + 'a {
        self.rows.iter().map(move |r| r.value(column))
    }

    /// `[x, y]` pairs for plotting, in row order.
    pub fn xy(&self, x: Column, y: Column) -> impl Iterator<Item = [f64; 2]> + 'a {
        self.rows.iter().map(move |r| [r.value(x), r.value(y)])
    }
}

/// Restrict `dataset` to rows `[start, end)`.
///
/// Out-of-domain ranges are rejected, never clamped: the caller owns the
/// control that produced them.
pub fn select_window(
    dataset: &PlantDataset,
    start: usize,
    end: usize,
) -> Result<WindowView<'_>, DataError> {
    let len = dataset.len();
    if start > end || end > len {
        return Err(DataError::InvalidRange { start, end, len });
    }
    Ok(WindowView {
        rows: &dataset.readings[start..end],
        offset: start,
    })
}
