//! Chart-ready series derived from a snapshot.

use crate::model::{CurrentView, ForecastMetric, WeatherSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub time_label: String,
    pub date_label: String,
    pub value: f64,
}

/// Forecast values for the selected metric, in snapshot order.
pub fn forecast_series(snapshot: &WeatherSnapshot, metric: ForecastMetric) -> Vec<SeriesPoint> {
    snapshot
        .forecast
        .iter()
        .map(|p| SeriesPoint {
            time_label: p.time_label.clone(),
            date_label: p.date_label.clone(),
            value: match metric {
                ForecastMetric::Temperature => p.temperature,
                ForecastMetric::Humidity => f64::from(p.humidity),
            },
        })
        .collect()
}

/// The four bars of the temperature overview: Current, Feels Like, Min, Max.
pub fn temperature_overview(current: &CurrentView) -> [(&'static str, f64); 4] {
    let o = current.overview;
    [("Current", o.current), ("Feels Like", o.feels_like), ("Min", o.min), ("Max", o.max)]
}
