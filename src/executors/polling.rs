//! Job polling executor
//!
//! Drives one job from submission to a terminal state. Every iteration
//! sleeps for the configured interval, then issues exactly one status
//! query; observations are applied strictly in request order.

use reqwest::Method;
use std::sync::Arc;

use crate::config::PollConfig;
use crate::error::GenError;
use crate::transformers::extract_history_record;
use crate::transport::{RequestOptions, Transport};
use crate::types::{Credential, JobHandle, JobPhase, JobStatus, ResultItem};

pub const HISTORY_PATH: &str = "/mweb/v1/get_history_by_ids";

/// Polls the history endpoint until the job settles or the budget runs out.
#[derive(Clone)]
pub struct JobPoller {
    transport: Arc<dyn Transport>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(transport: Arc<dyn Transport>, config: PollConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait for the job behind `handle` and return its result items in
    /// provider order.
    pub async fn wait(
        &self,
        handle: &JobHandle,
        credential: &Credential,
    ) -> Result<Vec<ResultItem>, GenError> {
        let mut job = JobStatus::default();
        let mut attempts: u32 = 0;

        while job.should_continue() && attempts < self.config.max_attempts {
            tokio::time::sleep(self.config.interval).await;
            attempts += 1;

            let data = self
                .transport
                .request(
                    Method::POST,
                    HISTORY_PATH,
                    credential,
                    RequestOptions::new().with_data(self.query_body(handle)),
                )
                .await?;

            let Some(record) = extract_history_record(&data, handle.history_id())? else {
                tracing::error!(history_id = %handle, attempt = attempts, "Job record missing");
                return Err(GenError::RecordMissing {
                    history_id: handle.history_id().to_string(),
                });
            };

            let items = record.result_items();
            job.apply(record.status, record.fail_code, items);
            tracing::debug!(
                history_id = %handle,
                attempt = attempts,
                status = job.status,
                items = job.items.len(),
                "Polled job status"
            );
        }

        Self::settle(handle, job, attempts)
    }

    fn query_body(&self, handle: &JobHandle) -> serde_json::Value {
        serde_json::json!({
            "history_ids": [handle.history_id()],
            "image_info": self.config.rendition,
        })
    }

    fn settle(
        handle: &JobHandle,
        job: JobStatus,
        attempts: u32,
    ) -> Result<Vec<ResultItem>, GenError> {
        match job.phase() {
            JobPhase::Succeeded => {
                tracing::info!(
                    history_id = %handle,
                    attempts,
                    items = job.items.len(),
                    "Generation completed"
                );
                Ok(job.items)
            }
            JobPhase::Failed if job.is_content_filtered() => Err(GenError::ContentFiltered {
                fail_code: job.fail_code.unwrap_or_default(),
            }),
            JobPhase::Failed => Err(GenError::GenerationFailed(format!(
                "job {handle} failed with fail code {}",
                job.fail_code.as_deref().unwrap_or("unknown")
            ))),
            JobPhase::Submitted | JobPhase::Processing => {
                tracing::warn!(history_id = %handle, attempts, "Generation timed out");
                Err(GenError::GenerationTimeout {
                    history_id: handle.history_id().to_string(),
                    attempts,
                })
            }
            JobPhase::Unexpected => Err(GenError::GenerationFailed(format!(
                "job {handle} ended with status {} and no results",
                job.status
            ))),
        }
    }
}
