use eframe::egui::{self, Color32, RichText, Ui};

use aqi_dashboard::data::analysis::{fixed1, monthly_series, top_pollutants, weekday_series};

use crate::color;
use crate::state::AppState;
use crate::ui::charts;

// ---------------------------------------------------------------------------
// Dashboard tab: stat cards + charts
// ---------------------------------------------------------------------------

fn stat_card(ui: &mut Ui, title: &str, value: String, subtitle: &str, fill: Color32) {
    egui::Frame::group(ui.style())
        .fill(fill)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title.to_uppercase()).small().color(Color32::from_white_alpha(200)));
            ui.label(RichText::new(value).size(28.0).strong().color(Color32::WHITE));
            ui.label(RichText::new(subtitle).color(Color32::from_white_alpha(170)));
        });
}

/// Render the Dashboard tab.
pub fn dashboard_tab(ui: &mut Ui, state: &AppState) {
    let ins = &state.insights;

    ui.columns(4, |cols: &mut [Ui]| {
        stat_card(
            &mut cols[0],
            "Average AQI",
            fixed1(ins.avg_aqi),
            "Air Quality Index",
            Color32::from_rgb(109, 40, 217),
        );
        stat_card(
            &mut cols[1],
            "Avg Stations",
            fixed1(ins.avg_stations),
            "Monitoring Stations",
            Color32::from_rgb(29, 78, 216),
        );
        stat_card(
            &mut cols[2],
            "Total Records",
            ins.total_records.to_string(),
            "Data Points",
            Color32::from_rgb(14, 116, 144),
        );
        stat_card(
            &mut cols[3],
            "Average PM2.5",
            format!("{} μg/m³", fixed1(ins.avg_pm25)),
            "Fine Particles",
            Color32::from_rgb(180, 83, 9),
        );
    });
    ui.add_space(12.0);

    let monthly = monthly_series(ins);
    let weekly = weekday_series(ins);
    ui.columns(2, |cols: &mut [Ui]| {
        charts::line_chart(&mut cols[0], "AQI Over Time", &monthly, color::ACCENT);
        charts::area_chart(&mut cols[1], "Station Count by Weekday", &weekly);
    });
    ui.add_space(12.0);

    ui.columns(3, |cols: &mut [Ui]| {
        charts::status_bar_chart(
            &mut cols[0],
            "Air Quality Status Distribution",
            &ins.status_distribution,
        );
        charts::donut_chart(&mut cols[1], "Prominent Pollutants", top_pollutants(ins));
        charts::ring_chart(&mut cols[2], "Poor vs Good AQI", &state.alerts);
    });
}
