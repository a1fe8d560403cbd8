use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SolarDashApp {
    pub state: AppState,
}

impl SolarDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SolarDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Headline metrics (full dataset) ----
        egui::TopBottomPanel::top("metrics").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::metrics_row(ui, &self.state);
            ui.add_space(4.0);
        });

        // ---- Left side panel: row range ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_grid(ui, &self.state);
        });
    }
}
