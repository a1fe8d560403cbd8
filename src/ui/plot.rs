use std::ops::RangeInclusive;

use chrono::DateTime;
use eframe::egui::{Color32, Stroke, Ui};
use egui_extras::{Size, StripBuilder};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon};

use crate::color::ColorScale;
use crate::data::heatmap::Heatmap;
use crate::data::model::Column;
use crate::data::window::WindowView;
use crate::state::AppState;

/// Colour steps used by the scatter and heatmap legends.
const COLOR_STEPS: usize = 8;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the six charts as a 3 × 2 grid over the current window.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.window() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a plant data file to start  (File → Open…)");
        });
        return;
    };
    let heatmap = state.heatmap.as_ref();

    StripBuilder::new(ui)
        .sizes(Size::remainder(), 3)
        .vertical(|mut rows| {
            rows.strip(|builder| {
                builder.sizes(Size::remainder(), 2).horizontal(|mut cols| {
                    cols.cell(|ui| wind_cooling(ui, &view));
                    cols.cell(|ui| efficiency_vs_temp(ui, &view));
                });
            });
            rows.strip(|builder| {
                builder.sizes(Size::remainder(), 2).horizontal(|mut cols| {
                    cols.cell(|ui| phase_balance(ui, &view));
                    cols.cell(|ui| power_curve(ui, &view));
                });
            });
            rows.strip(|builder| {
                builder.sizes(Size::remainder(), 2).horizontal(|mut cols| {
                    cols.cell(|ui| thermal_heatmap(ui, heatmap));
                    cols.cell(|ui| inverter_performance(ui, &view));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn wind_cooling(ui: &mut Ui, view: &WindowView<'_>) {
    ui.strong("1. Wind-Cooling Effect");
    let scale = ColorScale::from_values(view.column(Column::ModuleTemp), COLOR_STEPS);
    show_xy(ui, "wind_cooling", Column::WindSpeed, Column::TempDelta, |plot_ui| {
        colored_scatter(
            plot_ui,
            view,
            Column::WindSpeed,
            Column::TempDelta,
            Column::ModuleTemp,
            &scale,
        );
    });
}

fn efficiency_vs_temp(ui: &mut Ui, view: &WindowView<'_>) {
    ui.strong("2. Temperature-Corrected Efficiency");
    let scale = ColorScale::from_values(view.column(Column::Irradiance), COLOR_STEPS);
    show_xy(ui, "efficiency_vs_temp", Column::ModuleTemp, Column::Efficiency, |plot_ui| {
        colored_scatter(
            plot_ui,
            view,
            Column::ModuleTemp,
            Column::Efficiency,
            Column::Irradiance,
            &scale,
        );
    });
}

fn phase_balance(ui: &mut Ui, view: &WindowView<'_>) {
    ui.strong("3. 3-Phase Load Balance");
    let phases = [
        (Column::PhaseRCurrent, "Phase R", Color32::from_rgb(220, 60, 60)),
        (Column::PhaseYCurrent, "Phase Y", Color32::from_rgb(230, 180, 40)),
        (Column::PhaseBCurrent, "Phase B", Color32::from_rgb(60, 110, 220)),
    ];
    show_xy(ui, "phase_balance", Column::Timestamp, Column::PhaseRCurrent, |plot_ui| {
        for (col, name, color) in phases {
            let points: PlotPoints = view.xy(Column::Timestamp, col).collect();
            plot_ui.line(Line::new(points).name(name).color(color).width(1.2));
        }
    });
}

fn power_curve(ui: &mut Ui, view: &WindowView<'_>) {
    ui.strong("4. Solar Power Curve");
    show_xy(ui, "power_curve", Column::Irradiance, Column::AcPower, |plot_ui| {
        let points: PlotPoints = view.xy(Column::Irradiance, Column::AcPower).collect();
        plot_ui.points(
            Points::new(points)
                .radius(1.5)
                .color(Color32::from_rgb(99, 110, 250))
                .name("Irradiance vs AC Power"),
        );
    });
}

fn thermal_heatmap(ui: &mut Ui, heatmap: Option<&Heatmap>) {
    ui.strong("5. Thermal Regression Visual");
    let (x, y) = heatmap.map_or((Column::AmbientTemp, Column::ModuleTemp), |hm| (hm.x, hm.y));
    show_xy(ui, "thermal_heatmap", x, y, |plot_ui| {
        let Some(hm) = heatmap else { return };
        let scale = ColorScale::new(0.0, hm.max_sum(), COLOR_STEPS);

        // Name only the first polygon of each colour step so the legend
        // lists every step once.
        let mut named = vec![false; scale.len()];
        for (xi, yi, cell) in hm.occupied() {
            let ([x0, x1], [y0, y1]) = hm.cell_bounds(xi, yi);
            let bucket = scale.bucket(cell.sum);
            let mut polygon = Polygon::new(PlotPoints::from(vec![
                [x0, y0],
                [x1, y0],
                [x1, y1],
                [x0, y1],
            ]))
            .fill_color(scale.color(bucket))
            .stroke(Stroke::NONE);
            if !named[bucket] {
                let (lo, hi) = scale.bucket_range(bucket);
                polygon = polygon.name(format!("Σ {} {lo:.1}–{hi:.1}", hm.z.header()));
                named[bucket] = true;
            }
            plot_ui.polygon(polygon);
        }
    });
}

fn inverter_performance(ui: &mut Ui, view: &WindowView<'_>) {
    ui.strong("6. DC Current vs. AC Power");
    show_xy(ui, "inverter_performance", Column::DcCurrent, Column::AcPower, |plot_ui| {
        let points: PlotPoints = view.xy(Column::DcCurrent, Column::AcPower).collect();
        plot_ui.line(
            Line::new(points)
                .name("DC input vs AC output")
                .color(Color32::from_rgb(0, 204, 150))
                .width(1.0),
        );
    });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Show an interactive plot with axis labels taken from the columns.
/// A timestamp x axis is labelled with wall-clock time.
fn show_xy(ui: &mut Ui, id: &str, x: Column, y: Column, add: impl FnOnce(&mut PlotUi)) {
    let y_label = match y {
        Column::PhaseRCurrent | Column::PhaseYCurrent | Column::PhaseBCurrent => {
            "AC current (A)".to_string()
        }
        _ => axis_label(y),
    };
    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(axis_label(x))
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if x == Column::Timestamp {
        plot = plot.x_axis_formatter(time_axis_label);
    }
    plot.show(ui, add);
}

fn axis_label(col: Column) -> String {
    match col.unit() {
        "" => col.header().to_string(),
        unit => format!("{} ({unit})", col.header()),
    }
}

/// Scatter of `x` vs `y`, one series per colour step of `color_by`.
fn colored_scatter(
    plot_ui: &mut PlotUi,
    view: &WindowView<'_>,
    x: Column,
    y: Column,
    color_by: Column,
    scale: &ColorScale,
) {
    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); scale.len()];
    for r in view.rows() {
        buckets[scale.bucket(r.value(color_by))].push([r.value(x), r.value(y)]);
    }
    for (bucket, points) in buckets.into_iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let (lo, hi) = scale.bucket_range(bucket);
        plot_ui.points(
            Points::new(PlotPoints::from(points))
                .radius(1.5)
                .color(scale.color(bucket))
                .name(format!("{} {lo:.1}–{hi:.1}", color_by.header())),
        );
    }
}

/// Unix seconds → wall-clock label for the timestamp axis.
fn time_axis_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    DateTime::from_timestamp(mark.value.round() as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
