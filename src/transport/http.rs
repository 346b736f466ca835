//! `reqwest` transport

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use std::time::Instant;

use super::{RequestOptions, Transport};
use crate::error::{GenError, compat};
use crate::types::Credential;

/// Web platform code sent with every call
const PLATFORM_CODE: &str = "7";

/// HTTP transport speaking the provider's web API envelope.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    assistant_id: u64,
}

impl HttpTransport {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, assistant_id: u64) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            assistant_id,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn headers(&self, credential: &Credential) -> Result<HeaderMap, GenError> {
        let token = credential.expose();
        let cookie = format!("sessionid={token}; sessionid_ss={token}; sid_tt={token}");

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie).map_err(|_| {
                GenError::InvalidParameter("credential contains invalid header characters".to_string())
            })?,
        );
        headers.insert("appid", HeaderValue::from(self.assistant_id));
        headers.insert("pf", HeaderValue::from_static(PLATFORM_CODE));
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
        options: RequestOptions,
    ) -> Result<serde_json::Value, GenError> {
        let url = self.url(path);
        let started = Instant::now();
        tracing::debug!(method = %method, path = %path, "Request started");

        let aid = self.assistant_id.to_string();
        let mut builder = self
            .http_client
            .request(method, &url)
            .headers(self.headers(credential)?)
            .query(&[
                ("aid", aid.as_str()),
                ("device_platform", "web"),
                ("region", "cn"),
            ])
            .query(&options.params);
        if let Some(data) = &options.data {
            builder = builder.json(data);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                path = %path,
                status_code = status.as_u16(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Request failed"
            );
            return Err(GenError::ApiError {
                code: status.as_u16().to_string(),
                message: text,
                details: None,
            });
        }

        tracing::debug!(
            path = %path,
            status_code = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            response_length = text.len(),
            "Request completed"
        );

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GenError::ParseError(format!("response from {path} is not JSON: {e}")))?;
        unwrap_envelope(body)
    }
}

/// Unwrap the `{ret, errmsg, data}` envelope.
///
/// `ret == "0"` yields `data`. Known balance codes become
/// [`GenError::InsufficientCredits`]; any other code is an [`GenError::ApiError`].
/// Bodies without `ret` are returned unchanged.
pub fn unwrap_envelope(body: serde_json::Value) -> Result<serde_json::Value, GenError> {
    let ret = match body.get("ret") {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Ok(body),
    };

    if ret == "0" {
        return Ok(body
            .get("data")
            .cloned()
            .unwrap_or(serde_json::Value::Null));
    }

    let message = body
        .get("errmsg")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error")
        .to_string();

    if compat::is_insufficient_credit_code(&ret) {
        return Err(GenError::insufficient_credits(format!("[ret={ret}] {message}")));
    }

    Err(GenError::ApiError {
        code: ret,
        message,
        details: Some(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_yields_data() {
        let data = unwrap_envelope(json!({"ret": "0", "errmsg": "success", "data": {"a": 1}})).unwrap();
        assert_eq!(data, json!({"a": 1}));
    }

    #[test]
    fn balance_codes_are_classified() {
        let err = unwrap_envelope(json!({"ret": "1006", "errmsg": "credit not enough"})).unwrap_err();
        assert!(matches!(err, GenError::InsufficientCredits { .. }));
    }

    #[test]
    fn other_codes_are_api_errors() {
        let err = unwrap_envelope(json!({"ret": 1015, "errmsg": "login error"})).unwrap_err();
        match err {
            GenError::ApiError { code, message, details } => {
                assert_eq!(code, "1015");
                assert_eq!(message, "login error");
                assert!(details.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bodies_without_envelope_pass_through() {
        let body = json!({"aigc_data": {"history_record_id": "1"}});
        assert_eq!(unwrap_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn url_joins_cleanly() {
        let transport = HttpTransport::new(reqwest::Client::new(), "https://example.com/", 513695);
        assert_eq!(
            transport.url("/mweb/v1/get_history_by_ids"),
            "https://example.com/mweb/v1/get_history_by_ids"
        );
    }
}
