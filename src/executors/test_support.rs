//! In-memory transport double for executor and client tests.

use async_trait::async_trait;
use reqwest::Method;
use std::sync::Mutex;

use crate::error::GenError;
use crate::transport::{RequestOptions, Transport};
use crate::types::Credential;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub token: String,
    pub params: Vec<(String, String)>,
    pub data: Option<serde_json::Value>,
}

type Responder =
    Box<dyn Fn(usize, &RecordedCall) -> Result<serde_json::Value, GenError> + Send + Sync>;

/// Answers calls from a script and records every request.
pub struct ScriptedTransport {
    responder: Responder,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Replay `responses` in order; calls past the end fail.
    pub fn new(responses: Vec<Result<serde_json::Value, GenError>>) -> Self {
        Self::from_fn(move |n, _| {
            responses
                .get(n)
                .cloned()
                .unwrap_or_else(|| Err(GenError::InternalError(format!("unscripted call #{n}"))))
        })
    }

    /// Answer with `f(call_index, call)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize, &RecordedCall) -> Result<serde_json::Value, GenError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path == path).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
        options: RequestOptions,
    ) -> Result<serde_json::Value, GenError> {
        let call = RecordedCall {
            method,
            path: path.to_string(),
            token: credential.expose().to_string(),
            params: options.params,
            data: options.data,
        };
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call.clone());
            calls.len() - 1
        };
        (self.responder)(index, &call)
    }
}

/// Status response body for one history record.
pub fn history(id: &str, status: i64, fail_code: Option<&str>, urls: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = urls
        .iter()
        .map(|url| serde_json::json!({"image": {"large_images": [{"image_url": url}]}}))
        .collect();
    serde_json::json!({
        id: {
            "status": status,
            "fail_code": fail_code.unwrap_or(""),
            "item_list": items,
        }
    })
}
