//! Prompt templates.
//!
//! Each template takes a [`WeatherSnapshot`] and returns the full prompt
//! string. The weather block embedded in every prompt comes from
//! [`snapshot_text`], so all templates describe the data the same way.

use std::fmt::Write as _;

use crate::model::{ChatMessage, ReportKind, Role, WeatherSnapshot};

/// Upcoming forecast entries included in the text block.
pub const MAX_FORECAST_ENTRIES: usize = 8;

/// Stable, human-readable rendering of a snapshot for embedding in prompts.
///
/// The forecast part lists the next entries in time order whatever window
/// the snapshot was normalized with.
pub fn snapshot_text(snapshot: &WeatherSnapshot) -> String {
    let c = &snapshot.current;
    let mut out = format!(
        "Location: {}\n\
         Current conditions:\n  \
         Temperature: {}\n  \
         Feels like: {}\n  \
         Humidity: {}\n  \
         Wind speed: {}\n  \
         Pressure: {}\n  \
         Description: {}\n\
         Forecast:\n",
        snapshot.location,
        c.temperature,
        c.feels_like,
        c.humidity,
        c.wind,
        c.pressure,
        c.description,
    );

    if snapshot.upcoming.is_empty() {
        out.push_str("  No forecast data available.\n");
    }
    for point in snapshot.upcoming.iter().take(MAX_FORECAST_ENTRIES) {
        let _ = writeln!(
            out,
            "  {} {}: {}, humidity {}, {}",
            point.date_label,
            point.time_label,
            point.temperature_label,
            point.humidity_label,
            point.description
        );
    }
    out
}

pub fn news_report_prompt(snapshot: &WeatherSnapshot) -> String {
    format!(
        "You are a professional weather reporter. Create a news-style weather report for {} \
         using this weather data:\n\n{}\n\
         Make it engaging and informative, highlighting key weather patterns and what people \
         should expect. Keep it to 2-3 paragraphs.",
        snapshot.location,
        snapshot_text(snapshot),
    )
}

pub fn travel_advisory_prompt(snapshot: &WeatherSnapshot) -> String {
    format!(
        "You are a travel advisor. Based on this weather data for {}:\n\n{}\n\
         Create a detailed travel advisory. Include recommendations for activities, what to \
         wear, and any precautions travelers should take. Focus on practical advice.",
        snapshot.location,
        snapshot_text(snapshot),
    )
}

pub fn technical_analysis_prompt(snapshot: &WeatherSnapshot) -> String {
    format!(
        "You are a meteorologist. Provide a technical analysis of the weather conditions in {} \
         using this data:\n\n{}\n\
         Include analysis of pressure systems, temperature patterns, and anticipated weather \
         developments. Use technical terminology but make it understandable.",
        snapshot.location,
        snapshot_text(snapshot),
    )
}

pub fn report_prompt(kind: ReportKind, snapshot: &WeatherSnapshot) -> String {
    match kind {
        ReportKind::News => news_report_prompt(snapshot),
        ReportKind::Travel => travel_advisory_prompt(snapshot),
        ReportKind::Technical => technical_analysis_prompt(snapshot),
    }
}

/// Conversational prompt: expert persona, weather block, prior turns, then the question.
pub fn chat_prompt(snapshot: &WeatherSnapshot, history: &[ChatMessage], question: &str) -> String {
    let mut out = format!(
        "You are a knowledgeable local expert in weather, climate, environmental science and \
         public health for {location}.\n\
         Current weather data:\n{data}\n\
         When answering, connect weather conditions to health and daily activities, consider \
         both immediate and longer-term effects, give practical advice where relevant, and \
         acknowledge uncertainty for health, safety or prediction questions. Be conversational \
         yet informative.\n",
        location = snapshot.location,
        data = snapshot_text(snapshot),
    );

    if !history.is_empty() {
        out.push_str("\nConversation so far:\n");
        for message in history {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            let _ = writeln!(out, "{speaker}: {}", message.content);
        }
    }

    let _ = write!(out, "\nUser Question: {question}\n\nResponse:");
    out
}
