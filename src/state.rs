use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use aqi_dashboard::config::Config;
use aqi_dashboard::data::analysis::{analyze_data, AlertCounts, InsightData};
use aqi_dashboard::data::filter::{filtered_indices, FilterOptions, FilterState};
use aqi_dashboard::data::insights::generate_insights;
use aqi_dashboard::data::loader::load_file;
use aqi_dashboard::data::model::{AqiDataset, AqiRecord, DataSource};
use aqi_dashboard::data::sample::generate_sample_data;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Analysis,
}

/// Text typed into the searchable dropdowns.
#[derive(Debug, Clone, Default)]
pub struct SearchTerms {
    pub state: String,
    pub area: String,
    pub pollutant: String,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file or the sample is loaded).
    pub dataset: Option<AqiDataset>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Choices offered by the filter widgets (cached).
    pub options: FilterOptions,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the visible records (cached).
    pub insights: InsightData,

    /// Sentences for the Analysis tab (cached).
    pub text_insights: Vec<String>,

    /// Poor-vs-good counts over the visible records (cached).
    pub alerts: AlertCounts,

    pub active_tab: Tab,

    pub search: SearchTerms,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

/// What "Export insights…" writes.
#[derive(Serialize)]
struct InsightExport<'a> {
    source: String,
    filters: &'a FilterState,
    insights: &'a InsightData,
    text_insights: &'a [String],
}

impl AppState {
    /// Build the start-up state from the command-line configuration.
    ///
    /// A file that cannot be loaded is reported in the status line and,
    /// unless disabled, replaced by generated sample data.
    pub fn from_config(config: &Config) -> Self {
        let mut state = Self::default();
        match load_file(&config.data_path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records from {}",
                    dataset.len(),
                    config.data_path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) if config.no_sample => {
                log::error!("Failed to load {}: {e:#}", config.data_path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
            Err(e) => {
                log::warn!(
                    "Failed to load {} ({e:#}); using sample data",
                    config.data_path.display()
                );
                state.load_sample(Local::now().date_naive(), config.sample_seed);
                state.status_message = Some(format!("Showing sample data: {e:#}"));
            }
        }
        state
    }

    /// Replace the dataset with generated readings ending on `end`.
    pub fn load_sample(&mut self, end: NaiveDate, seed: u64) {
        let records = generate_sample_data(end, seed);
        self.set_dataset(AqiDataset::new(records, DataSource::Sample));
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: AqiDataset) {
        self.dataset = Some(dataset);
        self.filters = FilterState::default();
        self.search = SearchTerms::default();
        self.status_message = None;
        self.refilter();
    }

    /// Recompute everything derived from the dataset and filters.
    pub fn refilter(&mut self) {
        let records: &[AqiRecord] = self
            .dataset
            .as_ref()
            .map(|ds| ds.records.as_slice())
            .unwrap_or(&[]);

        self.options = FilterOptions::from_records(records, &self.filters);
        self.visible_indices = filtered_indices(records, &self.filters);

        let visible: Vec<&AqiRecord> = self.visible_indices.iter().map(|&i| &records[i]).collect();
        self.insights = analyze_data(&visible);
        self.alerts = AlertCounts::from_records(&visible);
        self.text_insights = generate_insights(&self.insights, &self.filters);

        log::debug!(
            "refiltered: {} of {} records visible",
            self.visible_indices.len(),
            records.len()
        );
    }

    pub fn total_records(&self) -> usize {
        self.dataset.as_ref().map_or(0, AqiDataset::len)
    }

    // -- Filter mutations (each one recomputes the view) --

    pub fn select_state(&mut self, state: Option<String>) {
        self.filters.set_state(state);
        self.search.area.clear();
        self.refilter();
    }

    pub fn select_area(&mut self, area: Option<String>) {
        self.filters.set_area(area);
        self.refilter();
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filters.set_date_range(start, end);
        self.refilter();
    }

    pub fn toggle_pollutant(&mut self, pollutant: &str) {
        self.filters.toggle_pollutant(pollutant);
        self.refilter();
    }

    pub fn clear_pollutants(&mut self) {
        self.filters.selected_pollutants.clear();
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search = SearchTerms::default();
        self.refilter();
    }

    /// Write the current insights as pretty JSON.
    pub fn export_insights(&self, path: &Path) -> Result<()> {
        let export = InsightExport {
            source: self
                .dataset
                .as_ref()
                .map(|ds| ds.source.to_string())
                .unwrap_or_default(),
            filters: &self.filters,
            insights: &self.insights,
            text_insights: &self.text_insights,
        };
        let json = serde_json::to_string_pretty(&export).context("serialising insights")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing insights to {}", path.display()))?;
        Ok(())
    }
}
