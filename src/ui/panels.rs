use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use aqi_dashboard::data::filter::search_options;

use crate::color;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A change requested by a filter widget, applied once the panel is drawn.
enum FilterAction {
    State(Option<String>),
    Area(Option<String>),
    Dates(Option<NaiveDate>, Option<NaiveDate>),
    TogglePollutant(String),
    ClearPollutants,
    ClearAll,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        let n_active = state.filters.active_filter_count();
        if n_active > 0 {
            ui.label(RichText::new(format!(" {n_active} ")).strong().background_color(color::ACCENT));
        }
    });
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so widgets can borrow the search boxes mutably.
    let options = state.options.clone();
    let filters = state.filters.clone();
    let (first_day, last_day) = date_bounds(state);
    let mut actions: Vec<FilterAction> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- State ----
            ui.strong("State");
            if let Some(choice) = searchable_select(
                ui,
                "state_select",
                "states",
                &options.states,
                filters.selected_state.as_deref(),
                &mut state.search.state,
            ) {
                actions.push(FilterAction::State(choice));
            }
            ui.add_space(6.0);

            // ---- Area ----
            ui.strong("Area");
            if let Some(choice) = searchable_select(
                ui,
                "area_select",
                "areas",
                &options.areas,
                filters.selected_area.as_deref(),
                &mut state.search.area,
            ) {
                actions.push(FilterAction::Area(choice));
            }
            ui.add_space(6.0);

            // ---- Date range ----
            ui.strong("Date range");
            let range = &filters.date_range;
            let mut start = range.start;
            let mut end = range.end;
            date_bound(ui, "date_start", "From", &mut start, first_day);
            date_bound(ui, "date_end", "Until", &mut end, last_day);
            ui.horizontal(|ui: &mut Ui| {
                ui.label(RichText::new(filters.date_range_label()).weak());
                if !range.is_empty() && ui.small_button("Clear").clicked() {
                    start = None;
                    end = None;
                }
            });
            if start != range.start || end != range.end {
                actions.push(FilterAction::Dates(start, end));
            }
            ui.add_space(6.0);

            // ---- Pollutants ----
            let n_selected = filters.selected_pollutants.len();
            let header = if n_selected == 0 {
                "Pollutants  (all)".to_string()
            } else {
                format!("Pollutants  ({n_selected}/{})", options.pollutants.len())
            };
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("pollutant_select")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.search.pollutant)
                            .hint_text("Search pollutants..."),
                    );
                    if n_selected > 0 && ui.small_button("Clear").clicked() {
                        actions.push(FilterAction::ClearPollutants);
                    }
                    let matches = search_options(&options.pollutants, &state.search.pollutant);
                    if matches.is_empty() {
                        ui.label(RichText::new(empty_text("pollutants", &state.search.pollutant)).weak());
                    }
                    for p in matches {
                        let mut checked = filters.selected_pollutants.iter().any(|s| s == p);
                        if ui.checkbox(&mut checked, p).changed() {
                            actions.push(FilterAction::TogglePollutant(p.to_string()));
                        }
                    }
                });

            ui.separator();
            if filters.has_active_filters() && ui.button("Clear all filters").clicked() {
                actions.push(FilterAction::ClearAll);
            }
        });

    for action in actions {
        match action {
            FilterAction::State(s) => state.select_state(s),
            FilterAction::Area(a) => state.select_area(a),
            FilterAction::Dates(s, e) => state.set_date_range(s, e),
            FilterAction::TogglePollutant(p) => state.toggle_pollutant(&p),
            FilterAction::ClearPollutants => state.clear_pollutants(),
            FilterAction::ClearAll => state.clear_filters(),
        }
    }
}

/// Dropdown with a search box and an "All" entry.
/// Returns `Some(new_selection)` when the user picked something.
fn searchable_select(
    ui: &mut Ui,
    id: &str,
    noun: &str,
    options: &[String],
    selected: Option<&str>,
    search: &mut String,
) -> Option<Option<String>> {
    let mut choice = None;
    let all_label = format!("All {noun}");

    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.unwrap_or(&all_label))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(search).hint_text(format!("Search {noun}...")));
            if ui.selectable_label(selected.is_none(), &all_label).clicked() {
                choice = Some(None);
            }
            let matches = search_options(options, search);
            if matches.is_empty() {
                ui.label(RichText::new(empty_text(noun, search)).weak());
            }
            for opt in matches {
                if ui.selectable_label(selected == Some(opt), opt).clicked() {
                    choice = Some(Some(opt.to_string()));
                }
            }
        });

    choice
}

fn empty_text(noun: &str, search: &str) -> String {
    if search.trim().is_empty() {
        format!("No {noun} available")
    } else {
        format!("No {noun} found")
    }
}

/// One end of the date range: a picker when set, otherwise a button that
/// starts the picker at `fallback`.
fn date_bound(ui: &mut Ui, id: &str, label: &str, value: &mut Option<NaiveDate>, fallback: NaiveDate) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        match value {
            Some(date) => {
                ui.add(DatePickerButton::new(date).id_salt(id));
                if ui.small_button("✖").clicked() {
                    *value = None;
                }
            }
            None => {
                if ui.button("Any").clicked() {
                    *value = Some(fallback);
                }
            }
        }
    });
}

/// Earliest and latest parseable dates in the dataset (today if none).
fn date_bounds(state: &AppState) -> (NaiveDate, NaiveDate) {
    let today = chrono::Local::now().date_naive();
    let dates = state
        .dataset
        .iter()
        .flat_map(|ds| ds.records.iter())
        .filter_map(|r| r.parsed_date());
    let (min, max) = dates.fold((None, None), |(lo, hi): (Option<NaiveDate>, Option<NaiveDate>), d| {
        (
            Some(lo.map_or(d, |l| l.min(d))),
            Some(hi.map_or(d, |h| h.max(d))),
        )
    });
    (min.unwrap_or(today), max.unwrap_or(today))
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
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export insights…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.active_tab, Tab::Dashboard, "Dashboard");
        ui.selectable_value(&mut state.active_tab, Tab::Analysis, "Analysis");

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded from {}, {} visible",
                state.total_records(),
                ds.source,
                state.visible_indices.len()
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
        .set_title("Open AQI data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match aqi_dashboard::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export insights")
        .set_file_name("aqi_insights.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_insights(&path) {
            Ok(()) => {
                log::info!("Exported insights to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export insights: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
