use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use aqi_dashboard::config::DEFAULT_DATA_PATH;
use aqi_dashboard::data::sample::generate_sample_data;

/// Write generated AQI readings as CSV.
#[derive(Parser)]
struct Args {
    /// Output file.
    #[arg(default_value = DEFAULT_DATA_PATH)]
    output: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Last day of the generated series (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let records = generate_sample_data(end, args.seed);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for record in &records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} readings ending {end} to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}
