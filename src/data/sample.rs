use chrono::{Duration, NaiveDate};

use super::model::AqiRecord;

/// Number of daily records produced by [`generate_sample_data`].
pub const SAMPLE_DAYS: usize = 200;

const STATES: [(&str, [&str; 4]); 5] = [
    ("Delhi", ["New Delhi", "Dwarka", "Rohini", "Anand Vihar"]),
    ("Maharashtra", ["Mumbai", "Pune", "Nagpur", "Nashik"]),
    ("Karnataka", ["Bangalore", "Mysore", "Hubli", "Mangalore"]),
    ("Tamil Nadu", ["Chennai", "Coimbatore", "Madurai", "Salem"]),
    ("West Bengal", ["Kolkata", "Howrah", "Durgapur", "Siliguri"]),
];

const STATUSES: [&str; 5] = ["Good", "Satisfactory", "Moderate", "Poor", "Very Poor"];

const POLLUTANTS: [&str; 6] = ["PM2.5", "PM10", "NO2", "CO", "O3", "SO2"];

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[0, n)`.
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Uniform integer in `[low, low + span)` as `f64`.
    fn whole(&mut self, low: u32, span: u32) -> f64 {
        (low as usize + self.below(span as usize)) as f64
    }
}

/// Generate demo readings, one per day counting back from `end`.
///
/// The same `seed` always yields the same records, so a dashboard started
/// without a data file is reproducible.
pub fn generate_sample_data(end: NaiveDate, seed: u64) -> Vec<AqiRecord> {
    let mut rng = SimpleRng::new(seed);
    let mut records = Vec::with_capacity(SAMPLE_DAYS);

    for day in 0..SAMPLE_DAYS {
        let date = end - Duration::days(day as i64);

        let (state, areas) = STATES[rng.below(STATES.len())];
        let area = areas[rng.below(areas.len())];

        let aqi = rng.whole(50, 300);
        let status = STATUSES[((aqi / 60.0) as usize).min(STATUSES.len() - 1)];

        // Partial Fisher-Yates: 1–3 distinct pollutants.
        let mut pool = POLLUTANTS;
        let picks = 1 + rng.below(3);
        for i in 0..picks {
            let j = i + rng.below(pool.len() - i);
            pool.swap(i, j);
        }

        records.push(AqiRecord {
            date: date.format("%Y-%m-%d").to_string(),
            state: state.to_string(),
            area: area.to_string(),
            aqi_value: aqi,
            air_quality_status: status.to_string(),
            prominent_pollutants: pool[..picks].join(", "),
            station_count: rng.whole(1, 10),
            pm25: rng.whole(20, 100),
            pm10: rng.whole(30, 150),
            co: rng.whole(1, 10),
            no2: rng.whole(10, 80),
            o3: rng.whole(20, 120),
            so2: rng.whole(5, 50),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn sample_is_deterministic_per_seed() {
        assert_eq!(generate_sample_data(end(), 7), generate_sample_data(end(), 7));
        assert_ne!(generate_sample_data(end(), 7), generate_sample_data(end(), 8));
    }

    #[test]
    fn sample_dates_count_back_daily() {
        let data = generate_sample_data(end(), 1);
        assert_eq!(data.len(), SAMPLE_DAYS);
        assert_eq!(data[0].date, "2024-06-30");
        assert_eq!(data[1].date, "2024-06-29");
        assert_eq!(data[SAMPLE_DAYS - 1].parsed_date(), Some(end() - Duration::days(199)));
    }

    #[test]
    fn sample_values_stay_in_range() {
        for r in generate_sample_data(end(), 42) {
            assert!((50.0..350.0).contains(&r.aqi_value), "aqi {}", r.aqi_value);
            assert!((1.0..=10.0).contains(&r.station_count));
            let expected = STATUSES[((r.aqi_value / 60.0) as usize).min(4)];
            assert_eq!(r.air_quality_status, expected);

            let (_, areas) = STATES.iter().find(|(s, _)| *s == r.state).unwrap();
            assert!(areas.contains(&r.area.as_str()));

            let pollutants: Vec<&str> = r.pollutants().collect();
            assert!((1..=3).contains(&pollutants.len()));
            let mut dedup = pollutants.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), pollutants.len());
        }
    }

    #[test]
    fn rng_below_is_bounded() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..1000 {
            assert!(rng.below(6) < 6);
        }
    }
}
