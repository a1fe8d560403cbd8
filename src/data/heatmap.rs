use super::model::Column;
use super::window::WindowView;

/// Accumulated z values of one heatmap cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub sum: f64,
    pub count: usize,
}

/// Equal-width 2-D binning of a window: each cell sums the z column over
/// the rows whose (x, y) fall inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub x: Column,
    pub y: Column,
    pub z: Column,
    pub bins: usize,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// Row-major, `cells[yi * bins + xi]`.
    cells: Vec<Cell>,
}

impl Heatmap {
    /// Bin `view` into `bins × bins` cells spanning the finite x/y extent.
    ///
    /// Returns `None` when no row has finite x and y, or `bins == 0`.
    pub fn build(view: &WindowView<'_>, x: Column, y: Column, z: Column, bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let points: Vec<[f64; 3]> = view
            .rows()
            .iter()
            .map(|r| [r.value(x), r.value(y), r.value(z)])
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .collect();
        if points.is_empty() {
            return None;
        }

        let x_range = extent(points.iter().map(|p| p[0]));
        let y_range = extent(points.iter().map(|p| p[1]));

        let mut cells = vec![Cell::default(); bins * bins];
        for [px, py, pz] in points {
            let xi = bin_index(px, x_range, bins);
            let yi = bin_index(py, y_range, bins);
            let cell = &mut cells[yi * bins + xi];
            if pz.is_finite() {
                cell.sum += pz;
            }
            cell.count += 1;
        }

        Some(Heatmap {
            x,
            y,
            z,
            bins,
            x_range,
            y_range,
            cells,
        })
    }

    /// `(x0, x1)` and `(y0, y1)` plot bounds of a cell.
    pub fn cell_bounds(&self, xi: usize, yi: usize) -> ([f64; 2], [f64; 2]) {
        let bw = (self.x_range[1] - self.x_range[0]) / self.bins as f64;
        let bh = (self.y_range[1] - self.y_range[0]) / self.bins as f64;
        let x0 = self.x_range[0] + xi as f64 * bw;
        let y0 = self.y_range[0] + yi as f64 * bh;
        ([x0, x0 + bw], [y0, y0 + bh])
    }

    /// Non-empty cells as `(xi, yi, cell)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.count > 0)
            .map(move |(i, c)| (i % self.bins, i / self.bins, *c))
    }

    /// Largest cell sum, for colour scaling.
    pub fn max_sum(&self) -> f64 {
        self.occupied().map(|(_, _, c)| c.sum).fold(0.0, f64::max)
    }
}

/// `[min, max]` of the values; a constant axis is widened to unit width.
fn extent(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if (max - min).abs() < f64::EPSILON {
        [min, min + 1.0]
    } else {
        [min, max]
    }
}

fn bin_index(v: f64, range: [f64; 2], bins: usize) -> usize {
    let t = (v - range[0]) / (range[1] - range[0]);
    ((t * bins as f64).floor() as usize).min(bins - 1)
}
