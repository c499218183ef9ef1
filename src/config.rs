use std::path::PathBuf;

use clap::Parser;

/// Default location of the readings table, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/aqi.csv";

/// Command-line options for the dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "aqi-dashboard", version, about = "Air-quality (AQI) dashboard")]
pub struct Config {
    /// CSV, JSON or Parquet file with AQI readings.
    #[arg(value_name = "FILE", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Start empty instead of falling back to generated sample data when
    /// the file cannot be loaded.
    #[arg(long)]
    pub no_sample: bool,

    /// Seed for the generated sample data.
    #[arg(long, default_value_t = 42)]
    pub sample_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            no_sample: false,
            sample_seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parser_defaults() {
        let parsed = Config::parse_from(["aqi-dashboard"]);
        let default = Config::default();
        assert_eq!(parsed.data_path, default.data_path);
        assert_eq!(parsed.no_sample, default.no_sample);
        assert_eq!(parsed.sample_seed, default.sample_seed);
    }

    #[test]
    fn parses_path_and_flags() {
        let cfg = Config::parse_from(["aqi-dashboard", "readings.json", "--no-sample", "--sample-seed", "9"]);
        assert_eq!(cfg.data_path, PathBuf::from("readings.json"));
        assert!(cfg.no_sample);
        assert_eq!(cfg.sample_seed, 9);
    }
}
