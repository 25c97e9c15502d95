//! Plain-text presenter: metrics, temperature overview and forecast chart.

use std::fmt::Write as _;

use skycast_core::{
    ForecastMetric, WeatherSnapshot,
    chart::{forecast_series, temperature_overview},
};

const BAR_WIDTH: usize = 40;

pub fn current_conditions(snapshot: &WeatherSnapshot) -> String {
    let c = &snapshot.current;
    let mut out = String::new();
    let _ = writeln!(out, "Current Weather in {}", snapshot.location);
    let _ = writeln!(
        out,
        "  Temperature: {} ({} vs feels like)",
        c.temperature, c.feels_like_delta
    );
    let _ = writeln!(out, "  Feels Like:  {}", c.feels_like);
    let _ = writeln!(out, "  Description: {}", capitalize(&c.description));
    let _ = writeln!(out, "  Humidity:    {}", c.humidity);
    let _ = writeln!(out, "  Wind Speed:  {}", c.wind);
    let _ = writeln!(out, "  Pressure:    {}", c.pressure);
    let _ = writeln!(out, "  Icon:        {}", c.icon_url);
    out
}

pub fn overview(snapshot: &WeatherSnapshot) -> String {
    let bars = temperature_overview(&snapshot.current);
    let max = bars.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max);

    let mut out = String::from("Temperature Overview\n");
    for (label, value) in bars {
        let _ = writeln!(
            out,
            "  {label:<10} {:<width$} {value:.1}°",
            bar(value, max),
            width = BAR_WIDTH
        );
    }
    out
}

pub fn forecast(snapshot: &WeatherSnapshot, metric: ForecastMetric) -> String {
    let mut out = format!("{} - {} Forecast\n", snapshot.window.title(), metric.title());
    let series = forecast_series(snapshot, metric);
    if series.is_empty() {
        out.push_str("  No forecast data available.\n");
        return out;
    }

    let _ = writeln!(out, "  {}", metric.axis_label(snapshot.units));
    let max = series.iter().map(|p| p.value).fold(f64::MIN, f64::max);
    let mut current_date = None;
    for point in &series {
        if current_date != Some(point.date_label.as_str()) {
            current_date = Some(point.date_label.as_str());
            let _ = writeln!(out, "  {}", point.date_label);
        }
        let _ = writeln!(
            out,
            "    {:>5} {:<width$} {:.1}",
            point.time_label,
            bar(point.value, max),
            point.value,
            width = BAR_WIDTH
        );
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{ForecastWindow, RawCurrentConditions, RawForecastPoint, Units, normalize};

    fn snapshot(points: i64, window: ForecastWindow) -> WeatherSnapshot {
        let current = RawCurrentConditions {
            temperature: 20.0,
            feels_like: 19.0,
            temp_min: 10.0,
            temp_max: 25.0,
            humidity: 40,
            pressure: 1015,
            wind_speed: 2.5,
            description: "broken clouds".into(),
            icon: "04n".into(),
            name: "Denver".into(),
            country: "US".into(),
            timestamp: 1_705_276_800,
            utc_offset_secs: 0,
        };
        let forecast: Vec<RawForecastPoint> = (0..points)
            .map(|i| RawForecastPoint {
                timestamp: 1_705_276_800 + i * 3 * 3600,
                temperature: 10.0 + i as f64,
                humidity: 50,
                description: "clear sky".into(),
            })
            .collect();
        normalize(&current, &forecast, Units::Imperial, window)
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("light rain"), "Light rain");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn bar_scales_to_max() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(-3.0, 10.0), "");
        assert_eq!(bar(3.0, 0.0), "");
    }

    #[test]
    fn current_conditions_lists_metrics() {
        let text = current_conditions(&snapshot(1, ForecastWindow::CurrentDay));
        assert!(text.starts_with("Current Weather in Denver, US\n"));
        assert!(text.contains("Temperature: 20°F (1.0° vs feels like)"));
        assert!(text.contains("Description: Broken clouds"));
        assert!(text.contains("Wind Speed:  2.5 mph"));
    }

    #[test]
    fn overview_has_four_bars() {
        let text = overview(&snapshot(1, ForecastWindow::CurrentDay));
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("Feels Like"));
        assert!(text.contains("25.0°"));
    }

    #[test]
    fn forecast_groups_by_date() {
        let text = forecast(&snapshot(16, ForecastWindow::ThreeDay), ForecastMetric::Temperature);
        assert!(text.starts_with("3-Day Forecast - Temperature Forecast\n  Temperature (°F)\n"));
        assert!(text.contains("  2024-01-15\n"));
        assert!(text.contains("  2024-01-16\n"));
    }

    #[test]
    fn empty_forecast_shows_no_data() {
        let text = forecast(&snapshot(0, ForecastWindow::FiveDay), ForecastMetric::Humidity);
        assert_eq!(text, "5-Day Forecast - Humidity Forecast\n  No forecast data available.\n");
    }
}
