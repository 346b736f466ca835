//! Shared fixtures for mock-server tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use dreamgen::prelude::*;
use dreamgen::utils::SequentialIdGenerator;
use serde_json::{Value, json};
use wiremock::{Match, MockServer, Request, ResponseTemplate};

pub const SUBMIT_PATH: &str = "/mweb/v1/aigc_draft/generate";
pub const HISTORY_PATH: &str = "/mweb/v1/get_history_by_ids";
pub const USER_CREDIT_PATH: &str = "/commerce/v1/benefits/user_credit";
pub const CREDIT_RECEIVE_PATH: &str = "/commerce/v1/benefits/credit_receive";

pub const SESSION: &str = "test-session";

/// Successful `{ret, errmsg, data}` envelope.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ret": "0",
        "errmsg": "success",
        "data": data,
    }))
}

/// Failed envelope carrying a provider `ret` code.
pub fn ret(code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ret": code,
        "errmsg": message,
        "data": null,
    }))
}

pub fn submitted(history_id: &str) -> ResponseTemplate {
    ok(json!({"aigc_data": {"history_record_id": history_id}}))
}

pub fn record(history_id: &str, status: i64, fail_code: &str, urls: &[&str]) -> ResponseTemplate {
    let items: Vec<Value> = urls
        .iter()
        .map(|url| json!({"image": {"large_images": [{"image_url": url}]}}))
        .collect();
    ok(json!({
        history_id: {
            "status": status,
            "fail_code": fail_code,
            "item_list": items,
        }
    }))
}

/// Matches submissions whose draft asks for the given resolution tier.
pub struct DraftTier(pub &'static str);

impl Match for DraftTier {
    fn matches(&self, request: &Request) -> bool {
        draft_of(request)
            .map(|draft| draft.to_string().contains(&format!("\"resolution_type\":\"{}\"", self.0)))
            .unwrap_or(false)
    }
}

/// Parsed `draft_content` of a submission request.
pub fn draft_of(request: &Request) -> Option<Value> {
    let body: Value = serde_json::from_slice(&request.body).ok()?;
    serde_json::from_str(body.get("draft_content")?.as_str()?).ok()
}

/// Client pointed at the mock server with a fast poll interval.
///
/// Credit checks are off; tests that exercise them turn them back on.
pub fn client(server: &MockServer) -> DreamgenBuilder {
    DreamgenClient::builder()
        .base_url(server.uri())
        .http_credits(false)
        .poll_interval(Duration::from_millis(5))
        .id_generator(Arc::new(SequentialIdGenerator::new("node")))
}

pub fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::builder(prompt, Credential::new(SESSION))
        .build()
        .expect("valid request")
}
