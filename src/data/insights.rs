use super::analysis::{aqi_category, fixed1, InsightData};
use super::filter::FilterState;

/// |r| above which the station/AQI correlation is worth mentioning.
const CORRELATION_NOTE_THRESHOLD: f64 = 0.3;

/// Turn computed statistics into short sentences for the Analysis tab.
///
/// Sentences come in a fixed order: overall category, worst state, worst
/// area, station correlation, worst weekday, dominant pollutant, then notes
/// about the active filters.
pub fn generate_insights(insights: &InsightData, filters: &FilterState) -> Vec<String> {
    let mut out = Vec::new();

    out.push(format!(
        "Overall air quality is {} with an average AQI of {}",
        aqi_category(insights.avg_aqi).to_lowercase(),
        fixed1(insights.avg_aqi)
    ));

    if let Some(worst) = insights.state_stats.first() {
        out.push(format!(
            "{} has the highest average AQI of {}",
            worst.name,
            fixed1(worst.avg_aqi)
        ));
    }

    if let Some(worst) = insights.area_stats.first() {
        out.push(format!(
            "{} has the highest average AQI of {}",
            worst.name,
            fixed1(worst.avg_aqi)
        ));
    }

    let r = insights.correlations.stations_aqi;
    if r.abs() > CORRELATION_NOTE_THRESHOLD {
        let kind = if r > 0.0 { "Positive" } else { "Negative" };
        out.push(format!(
            "{kind} correlation ({r:.2}) between monitoring stations and AQI"
        ));
    }

    // Strict comparison keeps the earliest day on ties.
    let worst_day = insights.weekday_stats.iter().reduce(|max, day| {
        if day.avg_aqi > max.avg_aqi {
            day
        } else {
            max
        }
    });
    if let Some(day) = worst_day {
        out.push(format!(
            "{}s have the highest average AQI of {}",
            day.day,
            fixed1(day.avg_aqi)
        ));
    }

    if let Some(dominant) = insights.pollutant_frequency.first() {
        out.push(format!(
            "{} is the most prominent pollutant ({}% of records)",
            dominant.name,
            fixed1(dominant.percentage)
        ));
    }

    if let Some(state) = &filters.selected_state {
        out.push(format!("Analysis filtered for {state} state"));
    }

    if !filters.selected_pollutants.is_empty() {
        out.push(format!(
            "Showing data for pollutants: {}",
            filters.selected_pollutants.join(", ")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::analysis::{analyze_data, CategoryShare, Correlations, GroupAverage, WeekdayStat};
    use crate::data::model::AqiRecord;

    #[test]
    fn empty_data_still_reports_overall_category() {
        let lines = generate_insights(&InsightData::default(), &FilterState::default());
        assert_eq!(
            lines,
            vec!["Overall air quality is good with an average AQI of 0.0".to_string()]
        );
    }

    #[test]
    fn full_insight_list_in_order() {
        let insights = InsightData {
            avg_aqi: 215.24,
            state_stats: vec![GroupAverage {
                name: "Delhi".into(),
                avg_aqi: 301.04,
            }],
            area_stats: vec![GroupAverage {
                name: "Anand Vihar".into(),
                avg_aqi: 340.0,
            }],
            correlations: Correlations { stations_aqi: -0.456 },
            weekday_stats: vec![
                WeekdayStat {
                    day: "Monday".into(),
                    avg_aqi: 180.0,
                    avg_stations: 2.0,
                },
                WeekdayStat {
                    day: "Friday".into(),
                    avg_aqi: 250.0,
                    avg_stations: 3.0,
                },
                WeekdayStat {
                    day: "Sunday".into(),
                    avg_aqi: 250.0,
                    avg_stations: 1.0,
                },
            ],
            pollutant_frequency: vec![CategoryShare {
                name: "PM2.5".into(),
                count: 42,
                percentage: 63.33,
            }],
            ..Default::default()
        };
        let mut filters = FilterState::default();
        filters.set_state(Some("Delhi".into()));
        filters.toggle_pollutant("PM2.5");
        filters.toggle_pollutant("NO2");

        let lines = generate_insights(&insights, &filters);
        assert_eq!(
            lines,
            vec![
                "Overall air quality is poor with an average AQI of 215.2",
                "Delhi has the highest average AQI of 301.0",
                "Anand Vihar has the highest average AQI of 340.0",
                "Negative correlation (-0.46) between monitoring stations and AQI",
                "Fridays have the highest average AQI of 250.0",
                "PM2.5 is the most prominent pollutant (63.3% of records)",
                "Analysis filtered for Delhi state",
                "Showing data for pollutants: PM2.5, NO2",
            ]
        );
    }

    #[test]
    fn weak_correlation_is_not_mentioned() {
        let insights = InsightData {
            correlations: Correlations { stations_aqi: 0.3 },
            ..Default::default()
        };
        let lines = generate_insights(&insights, &FilterState::default());
        assert!(!lines.iter().any(|l| l.contains("correlation")));
    }

    #[test]
    fn insights_from_analysed_records() {
        let data = vec![
            AqiRecord {
                date: "2024-01-01".into(),
                state: "Delhi".into(),
                area: "Dwarka".into(),
                aqi_value: 420.0,
                prominent_pollutants: "PM10".into(),
                ..Default::default()
            },
            AqiRecord {
                date: "2024-01-01".into(),
                state: "Delhi".into(),
                area: "Dwarka".into(),
                aqi_value: 440.0,
                prominent_pollutants: "PM10".into(),
                ..Default::default()
            },
        ];
        let refs: Vec<&AqiRecord> = data.iter().collect();
        let lines = generate_insights(&analyze_data(&refs), &FilterState::default());
        assert_eq!(lines[0], "Overall air quality is severe with an average AQI of 430.0");
        assert!(lines.contains(&"Mondays have the highest average AQI of 430.0".to_string()));
        assert!(lines.contains(&"PM10 is the most prominent pollutant (100.0% of records)".to_string()));
    }

    #[test]
    fn tied_averages_round_up() {
        let insights = InsightData {
            avg_aqi: 187.25,
            state_stats: vec![GroupAverage {
                name: "Delhi".into(),
                avg_aqi: 210.75,
            }],
            pollutant_frequency: vec![CategoryShare {
                name: "PM10".into(),
                count: 3,
                percentage: 37.5,
            }],
            ..Default::default()
        };
        let lines = generate_insights(&insights, &FilterState::default());
        assert_eq!(lines[0], "Overall air quality is moderate with an average AQI of 187.3");
        assert_eq!(lines[1], "Delhi has the highest average AQI of 210.8");
        assert!(lines.contains(&"PM10 is the most prominent pollutant (37.5% of records)".to_string()));
    }
}
