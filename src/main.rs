mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use eframe::egui;

use app::RentPandaApp;
use rent_panda::config::AppConfig;
use rent_panda::data::store::{DataStore, FileSource};
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Using listings file {}", config.data_path.display());

    // The listings file is required; a load failure ends the process.
    let state = AppState::new(DataStore::new(FileSource::new(&config.data_path)))
        .context("loading listings at startup")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rent Panda – Rental Market Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(RentPandaApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
