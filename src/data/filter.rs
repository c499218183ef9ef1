use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::AqiRecord;

/// Pollutant placeholders that never show up as a selectable option.
const PLACEHOLDER_POLLUTANTS: &[&str] = &["N/A", "NA"];

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Inclusive date bounds; a missing bound is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The user's current selections. `None` / empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub selected_state: Option<String>,
    pub selected_area: Option<String>,
    pub date_range: DateRange,
    pub selected_pollutants: Vec<String>,
}

impl FilterState {
    /// Select a state. The area selection is reset since it may not belong
    /// to the new state.
    pub fn set_state(&mut self, state: Option<String>) {
        self.selected_state = state;
        self.selected_area = None;
    }

    pub fn set_area(&mut self, area: Option<String>) {
        self.selected_area = area;
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.date_range = DateRange { start, end };
    }

    /// Add the pollutant if absent, remove it otherwise.
    pub fn toggle_pollutant(&mut self, pollutant: &str) {
        if let Some(pos) = self.selected_pollutants.iter().position(|p| p == pollutant) {
            self.selected_pollutants.remove(pos);
        } else {
            self.selected_pollutants.push(pollutant.to_string());
        }
    }

    /// Reset every selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// One per constrained dimension: state, area, date start, pollutants.
    pub fn active_filter_count(&self) -> usize {
        [
            self.selected_state.is_some(),
            self.selected_area.is_some(),
            self.date_range.start.is_some(),
            !self.selected_pollutants.is_empty(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Human-readable summary of the date bounds.
    pub fn date_range_label(&self) -> String {
        match (self.date_range.start, self.date_range.end) {
            (Some(s), Some(e)) => format!("{} - {}", iso(s), iso(e)),
            (Some(s), None) => format!("From {}", iso(s)),
            (None, Some(e)) => format!("Until {}", iso(e)),
            (None, None) => "Select date range".to_string(),
        }
    }

    /// Whether a record satisfies every active constraint.
    ///
    /// Dates are compared as ISO strings, so records must carry
    /// `YYYY-MM-DD` dates for the range filter to be meaningful.
    pub fn matches(&self, record: &AqiRecord) -> bool {
        if let Some(state) = &self.selected_state {
            if &record.state != state {
                return false;
            }
        }
        if let Some(area) = &self.selected_area {
            if &record.area != area {
                return false;
            }
        }
        if let Some(start) = self.date_range.start {
            if date_key(&record.date) < iso(start).as_str() {
                return false;
            }
        }
        if let Some(end) = self.date_range.end {
            if date_key(&record.date) > iso(end).as_str() {
                return false;
            }
        }
        if !self.selected_pollutants.is_empty() {
            let any = self
                .selected_pollutants
                .iter()
                .any(|sel| record.pollutants().any(|p| p.contains(sel.as_str())));
            if !any {
                return false;
            }
        }
        true
    }
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// The `YYYY-MM-DD` part of a date cell, so timestamps on the end day
/// still fall inside the range.
fn date_key(date: &str) -> &str {
    date.get(..10).unwrap_or(date)
}

/// Return indices of records that pass all active filters.
pub fn filtered_indices(records: &[AqiRecord], filters: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Records that pass all active filters, in source order.
pub fn apply_filters<'a>(records: &'a [AqiRecord], filters: &FilterState) -> Vec<&'a AqiRecord> {
    records.iter().filter(|r| filters.matches(r)).collect()
}

// ---------------------------------------------------------------------------
// Dropdown options
// ---------------------------------------------------------------------------

/// The choices offered by the filter widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub states: Vec<String>,
    /// Areas of the selected state, or every area when no state is selected.
    pub areas: Vec<String>,
    pub pollutants: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[AqiRecord], filters: &FilterState) -> Self {
        let non_blank = |s: &str| !s.trim().is_empty();

        let states: BTreeSet<&str> = records
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| non_blank(s))
            .collect();

        let areas: BTreeSet<&str> = records
            .iter()
            .filter(|r| {
                filters
                    .selected_state
                    .as_ref()
                    .map_or(true, |s| &r.state == s)
            })
            .map(|r| r.area.as_str())
            .filter(|a| non_blank(a))
            .collect();

        let pollutants: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.pollutants())
            .filter(|p| !PLACEHOLDER_POLLUTANTS.contains(p))
            .collect();

        Self {
            states: states.into_iter().map(String::from).collect(),
            areas: areas.into_iter().map(String::from).collect(),
            pollutants: pollutants.into_iter().map(String::from).collect(),
        }
    }
}

/// Case-insensitive substring search over dropdown options.
pub fn search_options<'a>(options: &'a [String], term: &str) -> Vec<&'a str> {
    let term = term.trim().to_lowercase();
    options
        .iter()
        .map(String::as_str)
        .filter(|o| term.is_empty() || o.to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, state: &str, area: &str, pollutants: &str) -> AqiRecord {
        AqiRecord {
            date: date.to_string(),
            state: state.to_string(),
            area: area.to_string(),
            prominent_pollutants: pollutants.to_string(),
            ..Default::default()
        }
    }

    fn records() -> Vec<AqiRecord> {
        vec![
            rec("2024-01-01", "Delhi", "Dwarka", "PM2.5, PM10"),
            rec("2024-01-15", "Delhi", "Rohini", "NO2"),
            rec("2024-02-01", "Karnataka", "Bangalore", "CO, O3"),
            rec("2024-03-01", "Karnataka", "Mysore", "N/A"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let data = records();
        assert_eq!(apply_filters(&data, &FilterState::default()).len(), 4);
    }

    #[test]
    fn state_and_area_filters_use_equality() {
        let data = records();
        let mut f = FilterState::default();
        f.set_state(Some("Delhi".into()));
        assert_eq!(filtered_indices(&data, &f), vec![0, 1]);

        f.set_area(Some("Rohini".into()));
        assert_eq!(filtered_indices(&data, &f), vec![1]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let data = records();
        let mut f = FilterState::default();
        f.set_date_range(NaiveDate::from_ymd_opt(2024, 1, 15), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(filtered_indices(&data, &f), vec![1, 2]);

        f.set_date_range(None, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filtered_indices(&data, &f), vec![0]);
    }

    #[test]
    fn end_bound_includes_timestamps_on_that_day() {
        let data = vec![
            rec("2024-01-31T18:45:00", "Delhi", "Dwarka", "PM10"),
            rec("2024-02-01 00:00:00", "Delhi", "Dwarka", "PM10"),
        ];
        let mut f = FilterState::default();
        f.set_date_range(NaiveDate::from_ymd_opt(2024, 1, 31), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filtered_indices(&data, &f), vec![0]);
    }

    #[test]
    fn pollutant_filter_matches_substrings() {
        let data = records();
        let mut f = FilterState::default();
        f.toggle_pollutant("PM");
        assert_eq!(filtered_indices(&data, &f), vec![0]);

        f.toggle_pollutant("O3");
        assert_eq!(filtered_indices(&data, &f), vec![0, 2]);

        f.toggle_pollutant("PM");
        assert_eq!(f.selected_pollutants, vec!["O3".to_string()]);
        assert_eq!(filtered_indices(&data, &f), vec![2]);
    }

    #[test]
    fn changing_state_resets_area() {
        let mut f = FilterState::default();
        f.set_state(Some("Delhi".into()));
        f.set_area(Some("Dwarka".into()));
        f.set_state(Some("Karnataka".into()));
        assert_eq!(f.selected_area, None);
    }

    #[test]
    fn active_filter_count_and_clear() {
        let mut f = FilterState::default();
        assert!(!f.has_active_filters());

        f.set_state(Some("Delhi".into()));
        f.set_date_range(None, NaiveDate::from_ymd_opt(2024, 1, 1));
        // An end-only range does not count as an active date filter.
        assert_eq!(f.active_filter_count(), 1);

        f.set_date_range(NaiveDate::from_ymd_opt(2023, 1, 1), None);
        f.toggle_pollutant("CO");
        assert_eq!(f.active_filter_count(), 3);

        f.clear();
        assert_eq!(f, FilterState::default());
    }

    #[test]
    fn date_range_label_variants() {
        let mut f = FilterState::default();
        assert_eq!(f.date_range_label(), "Select date range");
        let a = NaiveDate::from_ymd_opt(2024, 1, 1);
        let b = NaiveDate::from_ymd_opt(2024, 2, 1);
        f.set_date_range(a, None);
        assert_eq!(f.date_range_label(), "From 2024-01-01");
        f.set_date_range(None, b);
        assert_eq!(f.date_range_label(), "Until 2024-02-01");
        f.set_date_range(a, b);
        assert_eq!(f.date_range_label(), "2024-01-01 - 2024-02-01");
    }

    #[test]
    fn options_are_sorted_unique_and_scoped_to_state() {
        let mut data = records();
        data.push(rec("2024-03-02", "  ", "", "PM10"));

        let mut f = FilterState::default();
        let opts = FilterOptions::from_records(&data, &f);
        assert_eq!(opts.states, vec!["Delhi", "Karnataka"]);
        assert_eq!(opts.areas, vec!["Bangalore", "Dwarka", "Mysore", "Rohini"]);
        assert_eq!(opts.pollutants, vec!["CO", "NO2", "O3", "PM10", "PM2.5"]);

        f.set_state(Some("Karnataka".into()));
        let opts = FilterOptions::from_records(&data, &f);
        assert_eq!(opts.areas, vec!["Bangalore", "Mysore"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let opts = vec!["Delhi".to_string(), "West Bengal".to_string(), "Kerala".to_string()];
        assert_eq!(search_options(&opts, "EL"), vec!["Delhi"]);
        assert_eq!(search_options(&opts, "e"), vec!["Delhi", "West Bengal", "Kerala"]);
        assert_eq!(search_options(&opts, "").len(), 3);
        assert!(search_options(&opts, "zz").is_empty());
    }
}
