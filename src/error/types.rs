//! Core error types for the generation pipeline.

use thiserror::Error;

use super::compat;

/// Remediation text attached to a final insufficient-credit failure.
pub const INSUFFICIENT_CREDITS_GUIDANCE: &str = "Insufficient credits at every resolution tier. \
     Claim today's free credits on the web app, top up the account, or retry with another session token.";

/// Structured failure classification used by the resilience wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Provider rejected the prompt or reference on policy grounds
    ContentFiltered,
    /// Account balance cannot pay for the job at the requested tier
    InsufficientCredits,
    /// Polling budget ran out while the job was still processing
    Timeout,
    /// Anything else
    Generic,
}

/// Errors produced by the generation pipeline and its collaborators.
#[derive(Debug, Clone, Error)]
pub enum GenError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Provider answered with a non-success envelope or HTTP status
    #[error("API error {code}: {message}")]
    ApiError {
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Body could not be (de)serialized
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Body was valid JSON but did not have the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reference image upload failed; the job was never submitted
    #[error("Reference image upload failed: {0}")]
    ReferenceUploadFailed(String),

    /// Provider lost the job record between submission and polling
    #[error("Generation record {history_id} is missing from the status response")]
    RecordMissing { history_id: String },

    /// Poll budget exhausted while the job was still processing
    #[error("Generation {history_id} timed out after {attempts} status checks")]
    GenerationTimeout { history_id: String, attempts: u32 },

    /// Provider refused the content on policy grounds
    #[error("Generated content was filtered by the provider (fail code {fail_code})")]
    ContentFiltered { fail_code: String },

    /// Balance cannot cover the job
    #[error("Insufficient credits: {message}")]
    InsufficientCredits { message: String },

    /// Malformed or unexpected provider response, or a generic job failure
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GenError {
    /// Create an API error from a provider `ret` code and message.
    pub fn api_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an insufficient-credit error.
    pub fn insufficient_credits(message: impl Into<String>) -> Self {
        Self::InsufficientCredits {
            message: message.into(),
        }
    }

    /// Final insufficient-credit error raised once every tier has been tried.
    ///
    /// The original provider message is kept after the remediation text.
    pub fn credits_exhausted(last: &GenError) -> Self {
        Self::InsufficientCredits {
            message: format!("{INSUFFICIENT_CREDITS_GUIDANCE} (last error: {last})"),
        }
    }

    /// Classify this error for the resilience wrapper.
    ///
    /// Structured variants are inspected first. Only generic API and
    /// generation failures fall through to message matching.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::ContentFiltered { .. } => FailureClass::ContentFiltered,
            Self::InsufficientCredits { .. } => FailureClass::InsufficientCredits,
            Self::GenerationTimeout { .. } => FailureClass::Timeout,
            Self::ApiError { code, message, .. } => {
                if compat::is_insufficient_credit_code(code)
                    || compat::message_signals_insufficient_credits(message)
                {
                    FailureClass::InsufficientCredits
                } else {
                    FailureClass::Generic
                }
            }
            Self::GenerationFailed(message) => {
                if compat::message_signals_insufficient_credits(message) {
                    FailureClass::InsufficientCredits
                } else {
                    FailureClass::Generic
                }
            }
            _ => FailureClass::Generic,
        }
    }

    /// True when a lower resolution tier may still succeed.
    pub fn is_insufficient_credits(&self) -> bool {
        self.failure_class() == FailureClass::InsufficientCredits
    }
}
