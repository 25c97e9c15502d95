use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    error::{Endpoint, FetchError},
    model::{RawCurrentConditions, RawForecastPoint, Units},
};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

// Hand-written so the API key never lands in logs.
impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        city: &str,
        units: Units,
    ) -> Result<T, FetchError> {
        let path = match endpoint {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        };
        let url = format!("{}/{path}", self.base_url);

        debug!(%url, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for RawCurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        RawCurrentConditions {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            description,
            icon,
            name: parsed.name,
            country: parsed.sys.country,
            timestamp: parsed.dt,
            utc_offset_secs: parsed.timezone,
        }
    }
}

impl From<OwForecastEntry> for RawForecastPoint {
    fn from(entry: OwForecastEntry) -> Self {
        let description = entry
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        RawForecastPoint {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            humidity: entry.main.humidity,
            description,
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherProvider {
    async fn fetch_current(
        &self,
        city: &str,
        units: Units,
    ) -> Result<RawCurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self.get_json(Endpoint::Current, city, units).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(
        &self,
        city: &str,
        units: Units,
    ) -> Result<Vec<RawForecastPoint>, FetchError> {
        let parsed: OwForecastResponse = self.get_json(Endpoint::Forecast, city, units).await?;
        Ok(parsed.list.into_iter().map(RawForecastPoint::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
