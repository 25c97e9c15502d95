use async_trait::async_trait;
use std::fmt::Debug;
use tracing::warn;

use crate::{
    Config,
    error::GenerationError,
    model::{ChatMessage, ReportKind, WeatherSnapshot},
    narrator::gemini::GeminiClient,
    provider::ServiceId,
};

pub mod gemini;
pub mod prompt;

pub const REPORT_APOLOGY: &str =
    "Sorry, I couldn't generate the weather report at this time. Please try again later.";
pub const CHAT_APOLOGY: &str = "I apologize, but I'm having trouble processing your request \
     right now. Please try again later.";

/// Single text-completion call against an LLM.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Turns snapshots into prose. Generation failures never escape: they are
/// logged and replaced with a user-facing apology.
#[derive(Debug)]
pub struct Narrator<G> {
    generator: G,
}

impl<G: TextGenerator> Narrator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub async fn report(&self, kind: ReportKind, snapshot: &WeatherSnapshot) -> String {
        let prompt = prompt::report_prompt(kind, snapshot);
        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, kind = kind.title(), "weather report generation failed");
                REPORT_APOLOGY.to_string()
            }
        }
    }

    pub async fn answer(
        &self,
        snapshot: &WeatherSnapshot,
        history: &[ChatMessage],
        question: &str,
    ) -> String {
        let prompt = prompt::chat_prompt(snapshot, history, question);
        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "chat answer generation failed");
                CHAT_APOLOGY.to_string()
            }
        }
    }
}

/// Construct the Gemini client from config.
pub fn generator_from_config(config: &Config) -> anyhow::Result<GeminiClient> {
    let api_key = config.require_api_key(ServiceId::Gemini)?;
    let base_url = config.gemini_base_url.as_deref().unwrap_or(gemini::DEFAULT_BASE_URL);
    let model = config.gemini_model.as_deref().unwrap_or(gemini::DEFAULT_MODEL);

    Ok(GeminiClient::with_endpoint(api_key, base_url, model)?)
}
