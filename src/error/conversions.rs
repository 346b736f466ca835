//! Type Conversions for GenError
//!
//! This module contains From trait implementations for converting
//! common error types into GenError.

use super::types::GenError;

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for GenError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}
