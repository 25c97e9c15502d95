//! Raw provider payloads → [`WeatherSnapshot`].
//!
//! Everything here is a pure function of its inputs. Local times are derived
//! from the location's UTC offset carried by the current conditions, never
//! from the machine clock or timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, Utc};

use crate::model::{
    CurrentView, ForecastPoint, ForecastWindow, RawCurrentConditions, RawForecastPoint,
    TemperatureOverview, Units, WeatherSnapshot,
};

const ICON_URL_TEMPLATE: &str = "http://openweathermap.org/img/wn/{icon}@2x.png";
const BUCKET_HOURS: i64 = 6;

/// Build the canonical snapshot for one fetch cycle.
pub fn normalize(
    current: &RawCurrentConditions,
    forecast: &[RawForecastPoint],
    units: Units,
    window: ForecastWindow,
) -> WeatherSnapshot {
    let offset = location_offset(current.utc_offset_secs);
    let localized = localize(forecast, offset);

    let upcoming = localized
        .iter()
        .map(|(local, point)| forecast_point(local, point, units))
        .collect();
    let forecast = restrict(localized, window)
        .into_iter()
        .map(|(local, point)| forecast_point(&local, point, units))
        .collect();

    WeatherSnapshot {
        location: format!("{}, {}", current.name, current.country),
        units,
        window,
        current: current_view(current, units),
        forecast,
        upcoming,
    }
}

fn forecast_point(
    local: &DateTime<FixedOffset>,
    point: &RawForecastPoint,
    units: Units,
) -> ForecastPoint {
    ForecastPoint {
        timestamp: point.timestamp,
        time_label: format_time_label(local),
        date_label: local.format("%Y-%m-%d").to_string(),
        temperature: point.temperature,
        humidity: point.humidity,
        temperature_label: temperature_label(point.temperature, units),
        humidity_label: format!("{}%", point.humidity),
        description: point.description.clone(),
    }
}

/// Unit-labeled strings for the "now" panel.
pub fn current_view(current: &RawCurrentConditions, units: Units) -> CurrentView {
    CurrentView {
        temperature: temperature_label(current.temperature, units),
        feels_like: temperature_label(current.feels_like, units),
        temp_min: temperature_label(current.temp_min, units),
        temp_max: temperature_label(current.temp_max, units),
        humidity: format!("{}%", current.humidity),
        wind: format!("{} {}", current.wind_speed, units.speed_suffix()),
        pressure: format!("{} hPa", current.pressure),
        description: current.description.clone(),
        icon_url: icon_url(&current.icon),
        feels_like_delta: format!("{:.1}°", current.temperature - current.feels_like),
        overview: TemperatureOverview {
            current: current.temperature,
            feels_like: current.feels_like,
            min: current.temp_min,
            max: current.temp_max,
        },
    }
}

pub fn icon_url(icon: &str) -> String {
    ICON_URL_TEMPLATE.replace("{icon}", icon)
}

pub fn temperature_label(value: f64, units: Units) -> String {
    format!("{value}{}", units.temperature_suffix())
}

/// 12-hour clock label without a leading zero, e.g. `3 PM`, `12 AM`.
pub fn format_time_label(local: &DateTime<FixedOffset>) -> String {
    local.format("%-I %p").to_string()
}

/// Offset for a provider `timezone` value; out-of-range values fall back to UTC.
pub fn location_offset(utc_offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| Utc.fix())
}

/// Restrict the series to `window`, returning each kept point with its local time.
///
/// `CurrentDay` keeps the points sharing the first point's local date. The
/// multi-day windows keep points before the first point's day-start plus N
/// days, then keep only the first point of every 6-hour bucket counted from
/// that day-start.
pub fn window_forecast(
    points: &[RawForecastPoint],
    offset: FixedOffset,
    window: ForecastWindow,
) -> Vec<(DateTime<FixedOffset>, &RawForecastPoint)> {
    restrict(localize(points, offset), window)
}

/// Pair every point with its local time, sorted by timestamp.
fn localize(
    points: &[RawForecastPoint],
    offset: FixedOffset,
) -> Vec<(DateTime<FixedOffset>, &RawForecastPoint)> {
    let mut localized: Vec<_> = points
        .iter()
        .filter_map(|p| {
            DateTime::from_timestamp(p.timestamp, 0).map(|dt| (dt.with_timezone(&offset), p))
        })
        .collect();
    localized.sort_by_key(|(_, p)| p.timestamp);
    localized
}

fn restrict(
    mut localized: Vec<(DateTime<FixedOffset>, &RawForecastPoint)>,
    window: ForecastWindow,
) -> Vec<(DateTime<FixedOffset>, &RawForecastPoint)> {
    let Some(first_date) = localized.first().map(|(dt, _)| dt.date_naive()) else {
        return Vec::new();
    };

    let Some(days) = window.days() else {
        localized.retain(|(dt, _)| dt.date_naive() == first_date);
        return localized;
    };

    let day_start = first_date.and_time(NaiveTime::MIN);
    let end = day_start + Duration::days(days);

    let mut kept = Vec::new();
    let mut last_bucket = None;
    for (dt, point) in localized {
        let local = dt.naive_local();
        if local >= end {
            continue;
        }
        let bucket = (local - day_start).num_seconds().div_euclid(BUCKET_HOURS * 3600);
        if last_bucket != Some(bucket) {
            last_bucket = Some(bucket);
            kept.push((dt, point));
        }
    }
    kept
}
