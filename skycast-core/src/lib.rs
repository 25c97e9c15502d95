//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher
//! - Normalization of raw payloads into a [`WeatherSnapshot`], including
//!   forecast windowing and 6-hour resampling
//! - Chart series and LLM prompt templates built from a snapshot
//! - The per-user [`Session`] and the handlers that drive it
//!
//! It is used by `skycast-cli`, but can also be reused by other front-ends.

pub mod chart;
pub mod config;
pub mod error;
pub mod model;
pub mod narrator;
pub mod normalize;
pub mod provider;
pub mod session;

pub use config::{Config, ServiceConfig};
pub use error::{CycleError, Endpoint, FetchError, GenerationError, ValidationError};
pub use model::{
    ChatMessage, CurrentView, ForecastMetric, ForecastPoint, ForecastWindow, RawCurrentConditions,
    RawForecastPoint, ReportKind, Role, Units, WeatherSnapshot,
};
pub use narrator::{Narrator, TextGenerator, gemini::GeminiClient};
pub use normalize::normalize;
pub use provider::{ServiceId, WeatherFetcher, openweather::OpenWeatherProvider};
pub use session::Session;
