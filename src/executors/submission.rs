//! Job submission executor

use reqwest::Method;
use std::sync::Arc;

use crate::error::GenError;
use crate::transformers::{JobEnvelope, extract_job_handle};
use crate::transport::{RequestOptions, Transport};
use crate::types::{Credential, JobHandle};

pub const SUBMIT_PATH: &str = "/mweb/v1/aigc_draft/generate";

/// Issues the job-creation call.
#[derive(Clone)]
pub struct JobSubmitter {
    transport: Arc<dyn Transport>,
}

impl JobSubmitter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submit one job and return its polling key.
    pub async fn submit(
        &self,
        envelope: &JobEnvelope,
        credential: &Credential,
    ) -> Result<JobHandle, GenError> {
        let options = RequestOptions::new()
            .with_params(envelope.query_params()?)
            .with_data(envelope.to_body()?);

        let data = self
            .transport
            .request(Method::POST, SUBMIT_PATH, credential, options)
            .await?;
        let handle = extract_job_handle(&data)?;

        tracing::info!(
            history_id = %handle,
            submit_id = %envelope.submit_id,
            model = %envelope.root_model,
            tier = %envelope.geometry.tier,
            "Generation job submitted"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::test_support::ScriptedTransport;
    use crate::model_constants::ModelClass;
    use crate::params;
    use crate::transformers::JobRequestBuilder;
    use crate::types::GenerationRequest;
    use crate::utils::SequentialIdGenerator;
    use serde_json::json;

    fn envelope() -> (JobEnvelope, Credential) {
        let credential = Credential::new("token");
        let request = GenerationRequest::builder("a red fox", credential.clone())
            .build()
            .unwrap();
        let geometry = params::resolve(request.prompt(), None, None, ModelClass::Modern);
        let envelope = JobRequestBuilder::new(Arc::new(SequentialIdGenerator::new("n")))
            .build(&request, &geometry, None);
        (envelope, credential)
    }

    #[tokio::test]
    async fn submit_posts_draft_and_returns_handle() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(
            json!({"aigc_data": {"history_record_id": "h-1"}}),
        )]));
        let submitter = JobSubmitter::new(transport.clone());
        let (envelope, credential) = envelope();

        let handle = submitter.submit(&envelope, &credential).await.unwrap();
        assert_eq!(handle.history_id(), "h-1");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].path, SUBMIT_PATH);
        assert!(calls[0].params.iter().any(|(k, _)| k == "babi_param"));
        let body = calls[0].data.as_ref().unwrap();
        assert_eq!(body["submit_id"], json!(envelope.submit_id));
        assert!(body["draft_content"].is_string());
    }

    #[tokio::test]
    async fn missing_history_id_fails_generation() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({"aigc_data": {}}))]));
        let submitter = JobSubmitter::new(transport);
        let (envelope, credential) = envelope();

        let err = submitter.submit(&envelope, &credential).await.unwrap_err();
        assert!(matches!(err, GenError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(
            GenError::insufficient_credits("[ret=1006] not enough"),
        )]));
        let submitter = JobSubmitter::new(transport);
        let (envelope, credential) = envelope();

        let err = submitter.submit(&envelope, &credential).await.unwrap_err();
        assert!(err.is_insufficient_credits());
    }
}
