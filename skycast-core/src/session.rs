//! Per-user session context and the action handlers that mutate it.
//!
//! A [`Session`] holds the last snapshot and the chat transcript. Every
//! handler takes the session explicitly; nothing is global.

use tracing::{info, instrument};

use crate::{
    error::{CycleError, ValidationError},
    model::{ChatMessage, ForecastWindow, ReportKind, Units, WeatherSnapshot},
    narrator::{Narrator, TextGenerator},
    normalize::normalize,
    provider::WeatherFetcher,
};

#[derive(Debug, Default)]
pub struct Session {
    snapshot: Option<WeatherSnapshot>,
    transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Drop the snapshot and transcript.
    pub fn end(&mut self) {
        self.snapshot = None;
        self.transcript.clear();
    }
}

/// Trimmed city name, or an error if nothing is left.
pub fn validate_city(city: &str) -> Result<&str, ValidationError> {
    let city = city.trim();
    if city.is_empty() {
        Err(ValidationError::EmptyCity)
    } else {
        Ok(city)
    }
}

/// One fetch → normalize cycle. The session's snapshot is only replaced when
/// both provider calls succeed.
#[instrument(skip(fetcher, session))]
pub async fn fetch_cycle<'s, F>(
    fetcher: &F,
    session: &'s mut Session,
    city: &str,
    units: Units,
    window: ForecastWindow,
) -> Result<&'s WeatherSnapshot, CycleError>
where
    F: WeatherFetcher + ?Sized,
{
    let city = validate_city(city)?;

    let current = fetcher.fetch_current(city, units).await?;
    let forecast = fetcher.fetch_forecast(city, units).await?;

    let snapshot = normalize(&current, &forecast, units, window);
    info!(
        location = %snapshot.location,
        forecast_points = snapshot.forecast.len(),
        "weather snapshot refreshed"
    );

    Ok(session.snapshot.insert(snapshot))
}

/// Narrative report for the session's snapshot.
pub async fn report<G: TextGenerator>(
    narrator: &Narrator<G>,
    session: &Session,
    kind: ReportKind,
) -> Result<String, CycleError> {
    let snapshot = session.snapshot().ok_or(CycleError::NoSnapshot)?;
    Ok(narrator.report(kind, snapshot).await)
}

/// Answer a chat question and record both turns in the transcript.
pub async fn ask<G: TextGenerator>(
    narrator: &Narrator<G>,
    session: &mut Session,
    question: &str,
) -> Result<String, CycleError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ValidationError::EmptyQuestion.into());
    }
    let snapshot = session.snapshot.as_ref().ok_or(CycleError::NoSnapshot)?;

    let answer = narrator.answer(snapshot, &session.transcript, question).await;

    session.transcript.push(ChatMessage::user(question));
    session.transcript.push(ChatMessage::assistant(answer.clone()));
    Ok(answer)
}
