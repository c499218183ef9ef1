mod app;
mod color;
mod state;
mod ui;

use app::AqiDashboardApp;
use aqi_dashboard::config::Config;
use clap::Parser;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::parse();
    log::debug!("starting with {config:?}");
    let state = AppState::from_config(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AQI Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(AqiDashboardApp::new(state)))
        }),
    )
}
