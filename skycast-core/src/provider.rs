use crate::{
    Config,
    error::FetchError,
    model::{RawCurrentConditions, RawForecastPoint, Units},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// External services that need credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    OpenWeather,
    Gemini,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::Gemini => "gemini",
        }
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "OPENWEATHER_API_KEY",
            ServiceId::Gemini => "GEMINI_API_KEY",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::Gemini]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        ServiceId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| {
                let supported: Vec<&str> = ServiceId::all().iter().map(ServiceId::as_str).collect();
                anyhow::anyhow!(
                    "Unknown service '{value}'. Supported services: {}.",
                    supported.join(", ")
                )
            })
    }
}

/// Source of raw current conditions and 3-hour forecasts for a city.
///
/// Callers trim and validate `city` before calling.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        city: &str,
        units: Units,
    ) -> Result<RawCurrentConditions, FetchError>;

    async fn fetch_forecast(
        &self,
        city: &str,
        units: Units,
    ) -> Result<Vec<RawForecastPoint>, FetchError>;
}

/// Construct the OpenWeather fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.require_api_key(ServiceId::OpenWeather)?;

    let provider = match config.openweather_base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url),
        None => OpenWeatherProvider::new(api_key),
    };

    Ok(provider)
}
