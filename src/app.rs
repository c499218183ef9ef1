use eframe::egui::{self, ScrollArea, Ui};

use crate::state::{AppState, Tab};
use crate::ui::{analysis, dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AqiDashboardApp {
    pub state: AppState,
}

impl AqiDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AqiDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let message = match &self.state.dataset {
                None => Some("Open a file to view AQI data  (File → Open…)"),
                Some(ds) if ds.is_empty() => Some("The loaded file contains no records"),
                Some(_) => None,
            };
            if let Some(message) = message {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(message);
                });
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match self.state.active_tab {
                    Tab::Dashboard => dashboard::dashboard_tab(ui, &self.state),
                    Tab::Analysis => analysis::analysis_tab(ui, &self.state),
                });
        });
    }
}
