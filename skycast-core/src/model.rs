use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseChoiceError;

/// Unit system requested from the provider and used for labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Units {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(ParseChoiceError::new("units", s, "metric, imperial")),
        }
    }
}

/// How much of the forecast to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastWindow {
    #[default]
    CurrentDay,
    ThreeDay,
    FiveDay,
}

impl ForecastWindow {
    pub fn title(&self) -> &'static str {
        match self {
            ForecastWindow::CurrentDay => "Current Day",
            ForecastWindow::ThreeDay => "3-Day Forecast",
            ForecastWindow::FiveDay => "5-Day Forecast",
        }
    }

    /// Number of days covered by a multi-day window, `None` for the current day.
    pub fn days(&self) -> Option<i64> {
        match self {
            ForecastWindow::CurrentDay => None,
            ForecastWindow::ThreeDay => Some(3),
            ForecastWindow::FiveDay => Some(5),
        }
    }
}

impl FromStr for ForecastWindow {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current-day" | "current" | "today" | "1" | "1-day" => Ok(ForecastWindow::CurrentDay),
            "three-day" | "3-day" | "3" => Ok(ForecastWindow::ThreeDay),
            "five-day" | "5-day" | "5" => Ok(ForecastWindow::FiveDay),
            _ => Err(ParseChoiceError::new("forecast window", s, "current-day, 3-day, 5-day")),
        }
    }
}

/// Which forecast series the presenter charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMetric {
    #[default]
    Temperature,
    Humidity,
}

impl ForecastMetric {
    pub fn title(&self) -> &'static str {
        match self {
            ForecastMetric::Temperature => "Temperature",
            ForecastMetric::Humidity => "Humidity",
        }
    }

    /// Axis label, e.g. `Temperature (°C)` or `Humidity (%)`.
    pub fn axis_label(&self, units: Units) -> String {
        match self {
            ForecastMetric::Temperature => format!("Temperature ({})", units.temperature_suffix()),
            ForecastMetric::Humidity => "Humidity (%)".to_string(),
        }
    }
}

impl FromStr for ForecastMetric {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Ok(ForecastMetric::Temperature),
            "humidity" => Ok(ForecastMetric::Humidity),
            _ => Err(ParseChoiceError::new("forecast metric", s, "temperature, humidity")),
        }
    }
}

/// Style of the generated narrative report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    News,
    Travel,
    Technical,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::News => "News Style",
            ReportKind::Travel => "Travel Advisory",
            ReportKind::Technical => "Technical Analysis",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "news" | "news-style" => Ok(ReportKind::News),
            "travel" | "travel-advisory" => Ok(ReportKind::Travel),
            "technical" | "technical-analysis" => Ok(ReportKind::Technical),
            _ => Err(ParseChoiceError::new("report kind", s, "news, travel, technical")),
        }
    }
}

/// Provider response for "now", already unpacked from the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub name: String,
    pub country: String,
    pub timestamp: i64,
    /// Shift of the location's local time from UTC, in seconds.
    pub utc_offset_secs: i32,
}

/// One 3-hour forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastPoint {
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u8,
    pub description: String,
}

/// Unit-labeled view of the current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentView {
    pub temperature: String,
    pub feels_like: String,
    pub temp_min: String,
    pub temp_max: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub description: String,
    pub icon_url: String,
    /// Temperature minus feels-like, e.g. `1.5°`.
    pub feels_like_delta: String,
    /// Raw values behind the temperature overview chart.
    pub overview: TemperatureOverview,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureOverview {
    pub current: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
}

/// One entry of the windowed forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: i64,
    /// 12-hour clock label, e.g. `3 PM`.
    pub time_label: String,
    /// `YYYY-MM-DD` in the location's local time.
    pub date_label: String,
    pub temperature: f64,
    pub humidity: u8,
    pub temperature_label: String,
    pub humidity_label: String,
    pub description: String,
}

/// Canonical normalized result of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub units: Units,
    pub window: ForecastWindow,
    pub current: CurrentView,
    /// Series restricted to `window`, resampled for the multi-day windows.
    pub forecast: Vec<ForecastPoint>,
    /// Every returned point in time order, regardless of `window`.
    pub upcoming: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_suffixes() {
        assert_eq!(Units::Metric.temperature_suffix(), "°C");
        assert_eq!(Units::Metric.speed_suffix(), "m/s");
        assert_eq!(Units::Imperial.temperature_suffix(), "°F");
        assert_eq!(Units::Imperial.speed_suffix(), "mph");
    }

    #[test]
    fn units_parse_aliases() {
        assert_eq!("Metric".parse::<Units>().unwrap(), Units::Metric);
        assert_eq!("f".parse::<Units>().unwrap(), Units::Imperial);
        let err = "kelvin".parse::<Units>().unwrap_err();
        assert!(err.to_string().contains("unknown units 'kelvin'"));
    }

    #[test]
    fn window_parse_and_days() {
        assert_eq!("3-day".parse::<ForecastWindow>().unwrap(), ForecastWindow::ThreeDay);
        assert_eq!("five-day".parse::<ForecastWindow>().unwrap(), ForecastWindow::FiveDay);
        assert_eq!("today".parse::<ForecastWindow>().unwrap(), ForecastWindow::CurrentDay);
        assert_eq!(ForecastWindow::CurrentDay.days(), None);
        assert_eq!(ForecastWindow::FiveDay.days(), Some(5));
    }

    #[test]
    fn metric_axis_label_follows_units() {
        assert_eq!(ForecastMetric::Temperature.axis_label(Units::Imperial), "Temperature (°F)");
        assert_eq!(ForecastMetric::Humidity.axis_label(Units::Imperial), "Humidity (%)");
    }

    #[test]
    fn report_kind_parse() {
        assert_eq!("Travel-Advisory".parse::<ReportKind>().unwrap(), ReportKind::Travel);
        assert_eq!(ReportKind::Technical.title(), "Technical Analysis");
        assert!("weather".parse::<ReportKind>().is_err());
    }

    #[test]
    fn units_serde_lowercase() {
        let s = serde_json::to_string(&Units::Imperial).unwrap();
        assert_eq!(s, "\"imperial\"");
    }
}
