//! Loading, filtering and analysis of air-quality (AQI) readings.
//!
//! The desktop UI lives in the `aqi-dashboard` binary; everything here is
//! pure data transformation so it can be reused by the sample generator and
//! tested without a window.

pub mod config;
pub mod data;
