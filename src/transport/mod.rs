//! Transport abstraction
//!
//! The pipeline issues every remote call through [`Transport::request`].
//! [`HttpTransport`] is the `reqwest` implementation; tests and callers with
//! their own signing or session handling can inject another.

pub mod http;

use async_trait::async_trait;
use reqwest::Method;

use crate::error::GenError;
use crate::types::Credential;

pub use http::{HttpTransport, unwrap_envelope};

/// Query parameters and JSON body for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub params: Vec<(String, String)>,
    pub data: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Authenticated request primitive returning the parsed `data` payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
        options: RequestOptions,
    ) -> Result<serde_json::Value, GenError>;
}
