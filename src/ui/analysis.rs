use eframe::egui::{self, Color32, RichText, Ui};

use aqi_dashboard::data::analysis::fixed1;

use crate::color;
use crate::state::AppState;

/// Number of states listed in the ranking.
const RANKING_SIZE: usize = 5;

/// Render the Analysis tab: text insights, filter summary, state ranking.
pub fn analysis_tab(ui: &mut Ui, state: &AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.heading("Data Insights & Analysis");
        ui.add_space(6.0);
        egui::Grid::new("insight_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui: &mut Ui| {
                for (i, line) in state.text_insights.iter().enumerate() {
                    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                        ui.label(line);
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    });
    ui.add_space(12.0);

    filter_summary(ui, state);
    ui.add_space(12.0);

    state_ranking(ui, state);
}

fn summary_cell(ui: &mut Ui, value: String, caption: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(value).size(22.0).strong());
        ui.label(RichText::new(caption).weak());
    });
}

fn filter_summary(ui: &mut Ui, state: &AppState) {
    let f = &state.filters;
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("Current Filter Summary").heading());
        ui.add_space(6.0);
        ui.columns(4, |cols: &mut [Ui]| {
            summary_cell(&mut cols[0], state.visible_indices.len().to_string(), "Filtered Records");
            summary_cell(
                &mut cols[1],
                f.selected_state.clone().unwrap_or_else(|| "All".into()),
                "State",
            );
            summary_cell(
                &mut cols[2],
                f.selected_area.clone().unwrap_or_else(|| "All".into()),
                "Area",
            );
            let pollutants = match f.selected_pollutants.len() {
                0 => "All".to_string(),
                n => n.to_string(),
            };
            summary_cell(&mut cols[3], pollutants, "Pollutants");
        });
    });
}

fn state_ranking(ui: &mut Ui, state: &AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("State AQI Rankings").heading());
        ui.add_space(6.0);

        if state.insights.state_stats.is_empty() {
            ui.label(RichText::new("No data available").weak());
            return;
        }

        for (rank, s) in state.insights.state_stats.iter().take(RANKING_SIZE).enumerate() {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!(" {} ", rank + 1))
                        .strong()
                        .color(Color32::WHITE)
                        .background_color(color::rank_color(rank)),
                );
                ui.label(RichText::new(&s.name).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                    ui.label(format!("{} AQI", fixed1(s.avg_aqi)));
                });
            });
        }
    });
}
