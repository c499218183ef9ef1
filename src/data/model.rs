use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Status used when a row carries no `air_quality_status`.
pub const UNKNOWN_STATUS: &str = "Unknown";

// ---------------------------------------------------------------------------
// AqiRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single air-quality reading (one row of the source CSV).
///
/// Numeric fields that fail to parse are stored as `0.0`; the record is
/// never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiRecord {
    /// Reading date as it appears in the source (ISO `YYYY-MM-DD` expected).
    pub date: String,
    pub state: String,
    pub area: String,
    pub aqi_value: f64,
    pub air_quality_status: String,
    /// Comma-separated pollutant codes, e.g. `"PM2.5, NO2"`.
    pub prominent_pollutants: String,
    /// Number of monitoring stations contributing to the reading.
    pub station_count: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
}

impl Default for AqiRecord {
    fn default() -> Self {
        Self {
            date: String::new(),
            state: String::new(),
            area: String::new(),
            aqi_value: 0.0,
            air_quality_status: UNKNOWN_STATUS.to_string(),
            prominent_pollutants: String::new(),
            station_count: 0.0,
            pm25: 0.0,
            pm10: 0.0,
            co: 0.0,
            no2: 0.0,
            o3: 0.0,
            so2: 0.0,
        }
    }
}

impl AqiRecord {
    /// Individual pollutant codes, trimmed, empty entries dropped.
    pub fn pollutants(&self) -> impl Iterator<Item = &str> {
        self.prominent_pollutants
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// The reading date as a calendar date, if it is in a known format.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Parse a date cell. ISO dates are preferred but common export formats,
/// naive datetimes (as Parquet timestamps render) and full RFC 3339
/// timestamps are accepted too.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// AqiDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Where the records of a dataset came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    /// Generated demo data, used when no file could be loaded.
    Sample,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(p) => write!(f, "{}", p.display()),
            DataSource::Sample => write!(f, "sample data"),
        }
    }
}

/// The full parsed dataset.
#[derive(Debug, Clone)]
pub struct AqiDataset {
    pub records: Vec<AqiRecord>,
    pub source: DataSource,
}

impl AqiDataset {
    pub fn new(records: Vec<AqiRecord>, source: DataSource) -> Self {
        Self { records, source }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
