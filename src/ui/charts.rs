use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use aqi_dashboard::data::analysis::{fixed1, AlertCounts, CategoryShare};

use crate::color::{self, ColorMap};

const CHART_HEIGHT: f32 = 240.0;
const RING_THICKNESS: f32 = 28.0;

/// Card frame with a title, shared by every chart.
fn chart_card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).heading());
        ui.add_space(4.0);
        add_contents(ui);
    });
}

fn no_data(ui: &mut Ui) {
    ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("No data available").weak());
        });
    });
}

/// Axis formatter that shows `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Line / area charts
// ---------------------------------------------------------------------------

/// Monthly AQI as a line. `series` is `(label, value)` in display order.
pub fn line_chart(ui: &mut Ui, title: &str, series: &[(String, f64)], color: Color32) {
    chart_card(ui, title, |ui: &mut Ui| {
        if series.is_empty() {
            no_data(ui);
            return;
        }
        let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();
        let points: PlotPoints = series
            .iter()
            .enumerate()
            .map(|(i, (_, v))| [i as f64, *v])
            .collect();

        Plot::new(format!("{title}_plot"))
            .height(CHART_HEIGHT)
            .x_axis_formatter(category_axis(labels))
            .y_axis_label("AQI")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points).name("AQI").color(color).width(2.0));
            });
    });
}

/// Weekday AQI and station averages as two filled areas.
/// `series` is `(day, aqi, stations)`.
pub fn area_chart(ui: &mut Ui, title: &str, series: &[(String, f64, f64)]) {
    chart_card(ui, title, |ui: &mut Ui| {
        if series.is_empty() {
            no_data(ui);
            return;
        }
        let labels: Vec<String> = series.iter().map(|(d, _, _)| d.clone()).collect();
        let aqi: PlotPoints = series
            .iter()
            .enumerate()
            .map(|(i, (_, a, _))| [i as f64, *a])
            .collect();
        let stations: PlotPoints = series
            .iter()
            .enumerate()
            .map(|(i, (_, _, s))| [i as f64, *s])
            .collect();

        Plot::new(format!("{title}_plot"))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_formatter(category_axis(labels))
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(aqi).name("AQI").color(color::ACCENT).fill(0.0));
                plot_ui.line(
                    Line::new(stations)
                        .name("Stations")
                        .color(color::STATIONS)
                        .fill(0.0),
                );
            });
    });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Record count per air-quality status.
pub fn status_bar_chart(ui: &mut Ui, title: &str, shares: &[CategoryShare]) {
    chart_card(ui, title, |ui: &mut Ui| {
        if shares.is_empty() {
            no_data(ui);
            return;
        }
        let labels: Vec<String> = shares.iter().map(|s| s.name.clone()).collect();
        let bars: Vec<Bar> = shares
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Bar::new(i as f64, s.count as f64)
                    .name(format!("{} ({}%)", s.name, fixed1(s.percentage)))
                    .fill(color::status_color(&s.name))
                    .width(0.7)
            })
            .collect();

        Plot::new(format!("{title}_plot"))
            .height(CHART_HEIGHT)
            .x_axis_formatter(category_axis(labels))
            .y_axis_label("Records")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    });
}

// ---------------------------------------------------------------------------
// Donut / ring charts (painted directly)
// ---------------------------------------------------------------------------

/// A single ring made of `(fraction, colour)` segments, starting at 12 o'clock.
fn paint_ring(ui: &mut Ui, segments: &[(f32, Color32)], center_text: &str) {
    let size = egui::vec2(ui.available_width(), CHART_HEIGHT - 40.0);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = (rect.height().min(rect.width()) / 2.0 - RING_THICKNESS / 2.0).max(10.0);

    let mut angle = -FRAC_PI_2;
    for &(fraction, fill) in segments {
        let sweep = fraction.clamp(0.0, 1.0) * TAU;
        let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
        let points: Vec<Pos2> = (0..=steps)
            .map(|i| {
                let a = angle + sweep * i as f32 / steps as f32;
                center + radius * egui::vec2(a.cos(), a.sin())
            })
            .collect();
        painter.add(Shape::line(points, Stroke::new(RING_THICKNESS, fill)));
        angle += sweep;
    }

    painter.text(
        center,
        Align2::CENTER_CENTER,
        center_text,
        FontId::proportional(20.0),
        ui.visuals().strong_text_color(),
    );
}

fn legend_entry(ui: &mut Ui, swatch: Color32, text: String) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("■").color(swatch));
        ui.label(text);
    });
}

/// Share of the most prominent pollutants.
pub fn donut_chart(ui: &mut Ui, title: &str, slices: &[CategoryShare]) {
    chart_card(ui, title, |ui: &mut Ui| {
        let total: usize = slices.iter().map(|s| s.count).sum();
        if total == 0 {
            no_data(ui);
            return;
        }
        let colors = ColorMap::new(slices.iter().map(|s| s.name.as_str()));
        let segments: Vec<(f32, Color32)> = slices
            .iter()
            .map(|s| (s.count as f32 / total as f32, colors.color_for(&s.name)))
            .collect();
        paint_ring(ui, &segments, &total.to_string());

        for s in slices {
            legend_entry(
                ui,
                colors.color_for(&s.name),
                format!("{}  {} ({}%)", s.name, s.count, fixed1(s.percentage)),
            );
        }
    });
}

/// Poor (AQI > 200) versus good (AQI ≤ 100) readings.
pub fn ring_chart(ui: &mut Ui, title: &str, alerts: &AlertCounts) {
    chart_card(ui, title, |ui: &mut Ui| {
        let Some((poor_pct, good_pct)) = alerts.percentages() else {
            no_data(ui);
            return;
        };
        let segments = [
            (poor_pct as f32 / 100.0, color::POOR),
            (good_pct as f32 / 100.0, color::GOOD),
        ];
        paint_ring(ui, &segments, &alerts.total().to_string());

        legend_entry(
            ui,
            color::POOR,
            format!("Poor (AQI > 200)  {} ({}%)", alerts.poor, fixed1(poor_pct)),
        );
        legend_entry(
            ui,
            color::GOOD,
            format!("Good (AQI ≤ 100)  {} ({}%)", alerts.good, fixed1(good_pct)),
        );
    });
}
