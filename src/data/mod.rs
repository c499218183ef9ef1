/// Data layer: core types, loading, filtering and analysis.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        (or generated sample)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AqiDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterState predicate → filtered records
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  averages, group-bys, correlation → InsightData
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ insights  │  InsightData + FilterState → text sentences
///   └──────────┘
/// ```

pub mod analysis;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod sample;
