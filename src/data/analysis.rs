use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Weekday};
use serde::Serialize;

use super::model::AqiRecord;

/// Readings above this AQI count as poor in the alert ring.
pub const POOR_AQI_THRESHOLD: f64 = 200.0;
/// Readings at or below this AQI count as good in the alert ring.
pub const GOOD_AQI_THRESHOLD: f64 = 100.0;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AqiExtreme {
    pub value: f64,
    pub date: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub name: String,
    pub avg_aqi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub count: usize,
    /// Share of all analysed records, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStat {
    pub day: String,
    pub avg_aqi: f64,
    pub avg_stations: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// e.g. `"Jan 2024"`.
    pub month: String,
    pub aqi: f64,
    pub stations: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Correlations {
    pub stations_aqi: f64,
}

/// Everything the dashboard shows about the currently filtered records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightData {
    pub avg_aqi: f64,
    pub avg_stations: f64,
    pub total_records: usize,
    pub avg_pm25: f64,
    pub max_aqi: AqiExtreme,
    pub min_aqi: AqiExtreme,
    /// Sorted by average AQI, worst first.
    pub state_stats: Vec<GroupAverage>,
    /// Sorted by average AQI, worst first.
    pub area_stats: Vec<GroupAverage>,
    pub status_distribution: Vec<CategoryShare>,
    /// Sorted by count, most frequent first.
    pub pollutant_frequency: Vec<CategoryShare>,
    /// Monday through Sunday, days without readings omitted.
    pub weekday_stats: Vec<WeekdayStat>,
    /// Chronological.
    pub monthly_trend: Vec<MonthlyPoint>,
    pub correlations: Correlations,
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient of two equally long series.
/// Returns 0 for empty input or when either series is constant.
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let nf = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = nf * sum_xy - sum_x * sum_y;
    let denominator = ((nf * sum_x2 - sum_x * sum_x) * (nf * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Format with one decimal place, rounding ties away from zero
/// (`187.25` becomes `"187.3"`).
pub fn fixed1(x: f64) -> String {
    format!("{:.1}", (x * 10.0).round() / 10.0)
}

/// Map an AQI value to its national category name.
pub fn aqi_category(aqi: f64) -> &'static str {
    if aqi <= 50.0 {
        "Good"
    } else if aqi <= 100.0 {
        "Satisfactory"
    } else if aqi <= 200.0 {
        "Moderate"
    } else if aqi <= 300.0 {
        "Poor"
    } else if aqi <= 400.0 {
        "Very Poor"
    } else {
        "Severe"
    }
}

fn mean<'a>(records: &[&'a AqiRecord], f: impl Fn(&'a AqiRecord) -> f64) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| f(*r)).sum::<f64>() / records.len() as f64
}

/// Group averages sorted worst first; ties keep alphabetical order.
fn group_averages<'a>(
    records: &[&'a AqiRecord],
    key: impl Fn(&'a AqiRecord) -> &'a str,
) -> Vec<GroupAverage> {
    let mut groups: BTreeMap<&str, Vec<&AqiRecord>> = BTreeMap::new();
    for &r in records {
        groups.entry(key(r)).or_default().push(r);
    }
    let mut stats: Vec<GroupAverage> = groups
        .into_iter()
        .map(|(name, rows)| GroupAverage {
            name: name.to_string(),
            avg_aqi: mean(&rows, |r| r.aqi_value),
        })
        .collect();
    stats.sort_by(|a, b| b.avg_aqi.total_cmp(&a.avg_aqi));
    stats
}

fn shares(counts: HashMap<&str, usize>, total: usize) -> Vec<CategoryShare> {
    let mut out: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(name, count)| CategoryShare {
            name: name.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// Main analysis
// ---------------------------------------------------------------------------

/// Compute every aggregate shown on the dashboard.
///
/// Records whose date cannot be parsed still count towards every statistic
/// except the weekday and monthly groupings.
pub fn analyze_data(records: &[&AqiRecord]) -> InsightData {
    let Some(first) = records.first() else {
        return InsightData::default();
    };
    let total = records.len();

    // First occurrence wins on ties.
    let mut max_entry = *first;
    let mut min_entry = *first;
    for &r in records {
        if r.aqi_value > max_entry.aqi_value {
            max_entry = r;
        }
        if r.aqi_value < min_entry.aqi_value {
            min_entry = r;
        }
    }

    let mut status_counts: HashMap<&str, usize> = HashMap::new();
    let mut pollutant_counts: HashMap<&str, usize> = HashMap::new();
    let mut by_weekday: BTreeMap<u32, (Weekday, Vec<&AqiRecord>)> = BTreeMap::new();
    let mut by_month: BTreeMap<(i32, u32), Vec<&AqiRecord>> = BTreeMap::new();

    for &r in records {
        *status_counts.entry(r.air_quality_status.as_str()).or_default() += 1;
        for p in r.pollutants() {
            *pollutant_counts.entry(p).or_default() += 1;
        }
        if let Some(d) = r.parsed_date() {
            let day = d.weekday();
            by_weekday
                .entry(day.num_days_from_monday())
                .or_insert_with(|| (day, Vec::new()))
                .1
                .push(r);
            by_month.entry((d.year(), d.month())).or_default().push(r);
        }
    }

    let weekday_stats = by_weekday
        .into_values()
        .map(|(day, rows)| WeekdayStat {
            day: weekday_name(day).to_string(),
            avg_aqi: mean(&rows, |r| r.aqi_value),
            avg_stations: mean(&rows, |r| r.station_count),
        })
        .collect();

    let monthly_trend = by_month
        .into_iter()
        .filter_map(|((year, month), rows)| {
            let label = chrono::NaiveDate::from_ymd_opt(year, month, 1)?
                .format("%b %Y")
                .to_string();
            Some(MonthlyPoint {
                month: label,
                aqi: mean(&rows, |r| r.aqi_value),
                stations: mean(&rows, |r| r.station_count),
            })
        })
        .collect();

    let aqi: Vec<f64> = records.iter().map(|r| r.aqi_value).collect();
    let stations: Vec<f64> = records.iter().map(|r| r.station_count).collect();

    let insights = InsightData {
        avg_aqi: mean(records, |r| r.aqi_value),
        avg_stations: mean(records, |r| r.station_count),
        total_records: total,
        avg_pm25: mean(records, |r| r.pm25),
        max_aqi: AqiExtreme {
            value: max_entry.aqi_value,
            date: max_entry.date.clone(),
            area: max_entry.area.clone(),
        },
        min_aqi: AqiExtreme {
            value: min_entry.aqi_value,
            date: min_entry.date.clone(),
            area: min_entry.area.clone(),
        },
        state_stats: group_averages(records, |r| r.state.as_str()),
        area_stats: group_averages(records, |r| r.area.as_str()),
        status_distribution: shares(status_counts, total),
        pollutant_frequency: shares(pollutant_counts, total),
        weekday_stats,
        monthly_trend,
        correlations: Correlations {
            stations_aqi: calculate_correlation(&stations, &aqi),
        },
    };
    log::debug!(
        "analysed {} records: avg AQI {:.1}, {} states, {} months",
        insights.total_records,
        insights.avg_aqi,
        insights.state_stats.len(),
        insights.monthly_trend.len()
    );
    insights
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// Poor-vs-good reading counts for the alert ring chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    /// AQI above 200.
    pub poor: usize,
    /// AQI at or below 100.
    pub good: usize,
}

impl AlertCounts {
    pub fn from_records(records: &[&AqiRecord]) -> Self {
        Self {
            poor: records
                .iter()
                .filter(|r| r.aqi_value > POOR_AQI_THRESHOLD)
                .count(),
            good: records
                .iter()
                .filter(|r| r.aqi_value <= GOOD_AQI_THRESHOLD)
                .count(),
        }
    }

    pub fn total(&self) -> usize {
        self.poor + self.good
    }

    /// `(poor %, good %)` of the two counts combined.
    pub fn percentages(&self) -> Option<(f64, f64)> {
        let total = self.total();
        (total > 0).then(|| {
            (
                self.poor as f64 / total as f64 * 100.0,
                self.good as f64 / total as f64 * 100.0,
            )
        })
    }
}

/// Monthly AQI rounded for the line chart: `(label, aqi)`.
pub fn monthly_series(insights: &InsightData) -> Vec<(String, f64)> {
    insights
        .monthly_trend
        .iter()
        .map(|m| (m.month.clone(), m.aqi.round()))
        .collect()
}

/// Weekday AQI and station averages rounded: `(day, aqi, stations)`.
pub fn weekday_series(insights: &InsightData) -> Vec<(String, f64, f64)> {
    insights
        .weekday_stats
        .iter()
        .map(|w| (w.day.clone(), w.avg_aqi.round(), w.avg_stations.round()))
        .collect()
}

/// The five most frequent pollutants for the donut chart.
pub fn top_pollutants(insights: &InsightData) -> &[CategoryShare] {
    let n = insights.pollutant_frequency.len().min(5);
    &insights.pollutant_frequency[..n]
}
