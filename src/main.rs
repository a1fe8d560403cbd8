mod app;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::process;

use anyhow::Context;
use app::SolarDashApp;
use config::PlantConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}\n\n{}", cli::usage());
        process::exit(2);
    });
    if opts.help {
        println!("{}", cli::usage());
        return Ok(());
    }

    let config = match &opts.config {
        Some(path) => PlantConfig::from_json_file(path)?,
        None => PlantConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    log::info!(
        "Assuming a {} s sample interval from {} (no timestamps in source data)",
        config.sample_interval_secs,
        config.base_epoch
    );

    let data_path = opts
        .data_file
        .clone()
        .unwrap_or_else(|| config.data_path.clone());

    // A missing file is reported inside the window; the operator can pick
    // another one from File → Open.
    let mut state = AppState::new(config);
    state.open(&data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 950.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "☀ 2MW Solar Performance & Wind-Cooling Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SolarDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
