use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::TIMESTAMP_FORMAT;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – row-range filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(len) = state.dataset.as_ref().map(|ds| ds.len()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong("Select Data Range (Rows)");
    let (mut start, mut end) = state.range();
    let start_changed = ui
        .add(egui::Slider::new(&mut start, 0..=len).text("start"))
        .changed();
    let end_changed = ui
        .add(egui::Slider::new(&mut end, 0..=len).text("end"))
        .changed();

    // Keep the pair ordered: the slider being dragged pushes the other one.
    if start_changed && start > end {
        end = start;
    }
    if end_changed && end < start {
        start = end;
    }

    if ui.small_button("Reset").clicked() {
        (start, end) = state.config.default_window(len);
    }

    if (start, end) != state.range() {
        if let Err(e) = state.set_range(start, end) {
            log::warn!("Rejected row range: {e}");
            state.status_message = Some(e.to_string());
        }
    }

    ui.separator();
    window_info(ui, state);
}

fn window_info(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.window() else {
        return;
    };
    if view.is_empty() {
        ui.label("Window is empty.");
        return;
    }
    let range = view.source_range();
    ui.label(format!(
        "{} rows in window [{}, {})",
        view.len(),
        range.start,
        range.end
    ));

    if let (Some(first), Some(last)) = (view.rows().first(), view.rows().last()) {
        ui.label(format!(
            "{}\n→ {}",
            first.timestamp().format(TIMESTAMP_FORMAT),
            last.timestamp().format(TIMESTAMP_FORMAT)
        ));
    }

    ui.add_space(8.0);
    ui.label(
        RichText::new(format!(
            "Timestamps are synthesized at an assumed {} s sample interval.",
            state.config.sample_interval_secs
        ))
        .small()
        .weak(),
    );
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Render the four full-dataset statistics in a row.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    ui.columns(4, |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(summary.cards()) {
            col.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(label).small());
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.window().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export window as CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.data_path) {
            let window_len = state.window().map_or(0, |v| v.len());
            ui.label(format!(
                "{}: {} readings loaded, {} in window",
                path.file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default(),
                ds.len(),
                window_len
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open plant data")
        .add_filter("Supported files", &["zip", "csv", "parquet", "pq"])
        .add_filter("Zipped CSV", &["zip"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export window")
        .add_filter("CSV", &["csv"])
        .set_file_name("window.csv")
        .save_file();

    if let Some(path) = file {
        state.export_window(&path);
    }
}
