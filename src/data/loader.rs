use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{AqiDataset, AqiRecord, DataSource, UNKNOWN_STATUS};

/// Every column name (lower-case) the loader knows how to use.
const KNOWN_COLUMNS: &[&str] = &[
    "date",
    "state",
    "area",
    "aqi_value",
    "aqi",
    "air_quality_status",
    "prominent_pollutants",
    "number_of_monitoring_stations",
    "station_count",
    "pm25",
    "pm2.5",
    "pm10",
    "co",
    "no2",
    "o3",
    "so2",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an AQI dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one reading per line (the usual export)
/// * `.json`    – `[{ "date": "...", "state": "...", "aqi_value": 120, ... }, ...]`
/// * `.parquet` – flat columns with the same names as the CSV header
pub fn load_file(path: &Path) -> Result<AqiDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let text = std::fs::read_to_string(path).context("reading CSV file")?;
            parse_csv(&text)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    Ok(AqiDataset::new(records, DataSource::File(path.to_path_buf())))
}

// ---------------------------------------------------------------------------
// Row → AqiRecord
// ---------------------------------------------------------------------------

/// Build a record from a column lookup (lower-case column name → raw cell).
///
/// Missing or unparsable numbers become `0.0`, a blank status becomes
/// `"Unknown"`. Aliased columns are tried in order and the first non-zero
/// value wins.
fn build_record<'a, F>(get: F) -> AqiRecord
where
    F: Fn(&str) -> Option<&'a str>,
{
    let text = |col: &str| get(col).map(str::trim).unwrap_or("").to_string();
    let number = |cols: &[&str]| {
        cols.iter()
            .map(|&c| parse_number(get(c)))
            .find(|v| *v != 0.0)
            .unwrap_or(0.0)
    };

    let status = text("air_quality_status");
    AqiRecord {
        date: text("date"),
        state: text("state"),
        area: text("area"),
        aqi_value: number(&["aqi_value", "aqi"]),
        air_quality_status: if status.is_empty() {
            UNKNOWN_STATUS.to_string()
        } else {
            status
        },
        prominent_pollutants: text("prominent_pollutants"),
        station_count: number(&["number_of_monitoring_stations", "station_count"]),
        pm25: number(&["pm25", "pm2.5"]),
        pm10: number(&["pm10"]),
        co: number(&["co"]),
        no2: number(&["no2"]),
        o3: number(&["o3"]),
        so2: number(&["so2"]),
    }
}

/// Read the leading number of a cell (`"180.5 µg"` gives `180.5`).
/// Cells without one default to `0.0`.
fn parse_number(cell: Option<&str>) -> f64 {
    cell.map(|s| numeric_prefix(s.trim()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of `s` shaped like a decimal float literal.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}

fn check_known_columns<'a>(headers: impl IntoIterator<Item = &'a str> + Clone) -> Result<(), DataError> {
    if headers.clone().into_iter().any(|h| KNOWN_COLUMNS.contains(&h)) {
        Ok(())
    } else {
        let found: Vec<&str> = headers.into_iter().collect();
        Err(DataError::NoKnownColumns {
            found: found.join(", "),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text. Headers are trimmed and lower-cased; short rows are
/// tolerated and their missing cells take default values.
pub fn parse_csv(text: &str) -> Result<Vec<AqiRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    check_known_columns(headers.iter().map(String::as_str))?;

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        records.push(build_record(|col| index.get(col).and_then(|&i| row.get(i))));
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "date": "2024-01-01", "state": "Delhi", "aqi_value": 312, ... },
///   ...
/// ]
/// ```
///
/// Numbers may be given either as JSON numbers or as numeric strings.
pub fn parse_json(text: &str) -> Result<Vec<AqiRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().ok_or(DataError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(DataError::RowNotObject(i))?;
        let cells: BTreeMap<String, String> = obj
            .iter()
            .filter_map(|(k, v)| json_cell(v).map(|s| (k.trim().to_lowercase(), s)))
            .collect();
        if i == 0 {
            check_known_columns(cells.keys().map(String::as_str))?;
        }
        records.push(build_record(|col| cells.get(col).map(String::as_str)));
    }

    Ok(records)
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns carry the same names as the CSV header.
/// Text columns may be Utf8 or LargeUtf8; numeric columns any integer or
/// float type. Dates may also be stored as Date32 or a Timestamp.
fn load_parquet(path: &Path) -> Result<Vec<AqiRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        // Only the columns we know are rendered to text.
        let columns: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().trim().to_lowercase()))
            .filter(|(_, name)| KNOWN_COLUMNS.contains(&name.as_str()))
            .collect();
        if columns.is_empty() {
            let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
            return Err(DataError::NoKnownColumns {
                found: names.join(", "),
            }
            .into());
        }

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, name) in &columns {
                let col = batch.column(*col_idx);
                if col.is_null(row) {
                    continue;
                }
                let value = array_value_to_string(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?;
                cells.insert(name.clone(), value);
            }
            records.push(build_record(|col| cells.get(col).map(String::as_str)));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Date,State,Area,AQI_Value,Air_Quality_Status,Prominent_Pollutants,Number_Of_Monitoring_Stations,PM2.5
2024-01-01,Delhi,Dwarka,312,Very Poor,\"PM2.5, PM10\",4,180.5
2024-01-02,Karnataka,Bangalore,n/a,,CO,not-a-number,
";

    #[test]
    fn parse_csv_maps_columns_case_insensitively() {
        let records = parse_csv(SAMPLE_CSV).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.date, "2024-01-01");
        assert_eq!(first.state, "Delhi");
        assert_eq!(first.area, "Dwarka");
        assert_eq!(first.aqi_value, 312.0);
        assert_eq!(first.air_quality_status, "Very Poor");
        assert_eq!(first.prominent_pollutants, "PM2.5, PM10");
        assert_eq!(first.station_count, 4.0);
        assert_eq!(first.pm25, 180.5);
    }

    #[test]
    fn parse_csv_defaults_unparsable_cells() {
        let records = parse_csv(SAMPLE_CSV).unwrap();
        let second = &records[1];
        assert_eq!(second.aqi_value, 0.0);
        assert_eq!(second.station_count, 0.0);
        assert_eq!(second.pm25, 0.0);
        assert_eq!(second.air_quality_status, UNKNOWN_STATUS);
    }

    #[test]
    fn parse_csv_uses_aqi_alias_and_tolerates_short_rows() {
        let text = "date,state,aqi,pm25\n2024-02-01,Delhi,150\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aqi_value, 150.0);
        assert_eq!(records[0].pm25, 0.0);
        assert_eq!(records[0].area, "");
    }

    #[test]
    fn parse_csv_rejects_unrelated_tables() {
        let err = parse_csv("foo,bar\n1,2\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NoKnownColumns { .. })
        ));
    }

    #[test]
    fn parse_json_accepts_numbers_and_numeric_strings() {
        let text = r#"[
            {"date": "2024-01-01", "state": "Delhi", "aqi_value": 201, "number_of_monitoring_stations": "3"},
            {"date": "2024-01-02", "state": "Delhi", "aqi_value": null, "air_quality_status": "Good"}
        ]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].aqi_value, 201.0);
        assert_eq!(records[0].station_count, 3.0);
        assert_eq!(records[0].air_quality_status, UNKNOWN_STATUS);
        assert_eq!(records[1].aqi_value, 0.0);
        assert_eq!(records[1].air_quality_status, "Good");
    }

    #[test]
    fn parse_json_requires_array_of_objects() {
        let err = parse_json(r#"{"date": "2024-01-01"}"#).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::NotAnArray)));

        let err = parse_json(r#"[{"date": "2024-01-01"}, 3]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::RowNotObject(1))
        ));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aqi.CSV");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source, DataSource::File(path.clone()));

        let bad = dir.path().join("aqi.xlsx");
        std::fs::write(&bad, "").unwrap();
        let err = load_file(&bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn load_parquet_reads_typed_columns() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Utf8, false),
            Field::new("State", DataType::Utf8, false),
            Field::new("AQI_Value", DataType::Int64, false),
            Field::new("PM25", DataType::Float64, true),
            Field::new("operator", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2024-01-01", "2024-01-02"])),
                Arc::new(StringArray::from(vec!["Delhi", "Karnataka"])),
                Arc::new(Int64Array::from(vec![250, 75])),
                Arc::new(Float64Array::from(vec![Some(140.5), None])),
                Arc::new(StringArray::from(vec!["Alice", "Bob"])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aqi.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date, "2024-01-01");
        assert_eq!(ds.records[0].aqi_value, 250.0);
        assert_eq!(ds.records[0].pm25, 140.5);
        assert_eq!(ds.records[1].state, "Karnataka");
        assert_eq!(ds.records[1].pm25, 0.0);
        assert_eq!(ds.records[1].air_quality_status, UNKNOWN_STATUS);
    }

    #[test]
    fn parse_csv_trims_padded_cells() {
        let text = "date , state,area ,aqi_value,prominent_pollutants\n  2024-01-05 ,  Delhi , Rohini ,  280 , PM2.5 \n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.date, "2024-01-05");
        assert_eq!(rec.state, "Delhi");
        assert_eq!(rec.area, "Rohini");
        assert_eq!(rec.aqi_value, 280.0);
        assert_eq!(rec.prominent_pollutants, "PM2.5");
    }

    #[test]
    fn numeric_cells_keep_their_leading_number() {
        assert_eq!(parse_number(Some("180.5 µg")), 180.5);
        assert_eq!(parse_number(Some(" 42abc")), 42.0);
        assert_eq!(parse_number(Some("-3.5e2x")), -350.0);
        assert_eq!(parse_number(Some("7e")), 7.0);
        assert_eq!(parse_number(Some(".5")), 0.5);
        assert_eq!(parse_number(Some("n/a")), 0.0);
        assert_eq!(parse_number(Some("-")), 0.0);
        assert_eq!(parse_number(None), 0.0);
    }

    #[test]
    fn datetime_cells_join_the_time_groupings() {
        use crate::data::analysis::analyze_data;

        let text = "date,state,aqi_value\n2024-01-01 10:00:00,Delhi,300\n2024-01-02T00:00:00,Delhi,200\n";
        let records = parse_csv(text).unwrap();
        let refs: Vec<&AqiRecord> = records.iter().collect();
        let ins = analyze_data(&refs);
        assert_eq!(ins.weekday_stats.len(), 2);
        assert_eq!(ins.monthly_trend.len(), 1);
        assert_eq!(ins.monthly_trend[0].month, "Jan 2024");
    }

    #[test]
    fn load_parquet_reads_timestamp_dates() {
        use std::sync::Arc;

        use arrow::array::{Int64Array, StringArray, TimestampNanosecondArray};
        use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        use crate::data::analysis::analyze_data;

        // 2024-01-01T00:00:00 and 2024-02-06T12:00:00 in nanoseconds since the epoch.
        let stamps = vec![1_704_067_200_000_000_000_i64, 1_707_220_800_000_000_000_i64];
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Timestamp(TimeUnit::Nanosecond, None), false),
            Field::new("state", DataType::Utf8, false),
            Field::new("aqi_value", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(TimestampNanosecondArray::from(stamps)),
                Arc::new(StringArray::from(vec!["Delhi", "Delhi"])),
                Arc::new(Int64Array::from(vec![310, 150])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamps.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(
            ds.records[0].parsed_date(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        let refs: Vec<&AqiRecord> = ds.records.iter().collect();
        let ins = analyze_data(&refs);
        assert_eq!(ins.weekday_stats.len(), 2);
        let months: Vec<&str> = ins.monthly_trend.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["Jan 2024", "Feb 2024"]);
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("missing.csv")).is_err());
    }
}
