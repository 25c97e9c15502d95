use thiserror::Error;

/// Unknown value for one of the user-facing selectors.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseChoiceError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Input rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid city name.")]
    EmptyCity,

    #[error("Please enter a question.")]
    EmptyQuestion,
}

/// Which provider endpoint a fetch error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Current => f.write_str("current weather"),
            Endpoint::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching {endpoint} data: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error fetching {endpoint} data: status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("Error decoding {endpoint} data: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Request { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => *endpoint,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

/// Failure of a dashboard operation.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Please fetch weather data first by entering a city name.")]
    NoSnapshot,
}
