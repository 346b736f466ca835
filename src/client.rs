//! Generation client
//!
//! [`DreamgenClient`] runs the generation pipeline for one request:
//! geometry resolution, optional credit top-up, optional reference upload,
//! draft construction, submission and polling. The whole pipeline is
//! wrapped in a [`TierFallback`] so an account that cannot pay for the
//! highest tier is retried from scratch at the next lower one.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::GenError;
use crate::executors::{JobPoller, JobSubmitter, check_balances};
use crate::model_constants::{self, ModelClass};
use crate::params;
use crate::retry::TierFallback;
use crate::traits::{CreditBalance, CreditService, ReferenceUploader};
use crate::transformers::JobRequestBuilder;
use crate::transport::Transport;
use crate::types::{Credential, GenerationRequest, ResolutionTier, ResultItem, UploadedImage};
use crate::utils::{Clock, IdGenerator, SeedSource};

/// Image generation client
#[derive(Clone)]
pub struct DreamgenClient {
    config: ClientConfig,
    uploader: Option<Arc<dyn ReferenceUploader>>,
    credit_service: Option<Arc<dyn CreditService>>,
    request_builder: JobRequestBuilder,
    submitter: JobSubmitter,
    poller: JobPoller,
    fallback: TierFallback,
}

impl DreamgenClient {
    pub fn builder() -> crate::builder::DreamgenBuilder {
        crate::builder::DreamgenBuilder::new()
    }

    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, ids: Arc<dyn IdGenerator>) -> Self {
        let request_builder = JobRequestBuilder::new(ids).with_assistant_id(config.assistant_id);
        let submitter = JobSubmitter::new(transport.clone());
        let poller = JobPoller::new(transport, config.poll.clone());
        let fallback = TierFallback::new(config.tiers.clone());
        Self {
            config,
            uploader: None,
            credit_service: None,
            request_builder,
            submitter,
            poller,
            fallback,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn ReferenceUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_credit_service(mut self, service: Arc<dyn CreditService>) -> Self {
        self.credit_service = Some(service);
        self
    }

    pub fn with_seed_source(mut self, seeds: SeedSource) -> Self {
        self.request_builder = self.request_builder.with_seed_source(seeds);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.request_builder = self.request_builder.with_clock(clock);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_credit_service(&self) -> bool {
        self.credit_service.is_some()
    }

    /// Generate images, downgrading the resolution tier when credits run out.
    ///
    /// Result items keep the provider's order. Nothing is returned unless the
    /// job succeeds.
    pub async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ResultItem>, GenError> {
        request.validate_params()?;
        let start = request.resolution_hint().and_then(ResolutionTier::parse);

        self.fallback
            .execute(start, |tier| self.run_pipeline(request, tier))
            .await
    }

    /// Like [`generate_images`](Self::generate_images), reduced to one URL
    /// per item (`None` when the provider returned neither URL).
    pub async fn generate_image_urls(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Option<String>>, GenError> {
        let items = self.generate_images(request).await?;
        Ok(items
            .iter()
            .map(|item| item.url().map(str::to_string))
            .collect())
    }

    /// One full pipeline pass at `tier`, without fallback.
    pub async fn run_pipeline(
        &self,
        request: &GenerationRequest,
        tier: ResolutionTier,
    ) -> Result<Vec<ResultItem>, GenError> {
        let credential = request.credential();
        let model = model_constants::lookup(request.model());

        // Legacy models are pinned to 1k; only a caller request deserves the warning.
        let resolution_hint = match model.class {
            ModelClass::Legacy => request.resolution_hint(),
            _ => Some(tier.as_str()),
        };
        let geometry = params::resolve(
            request.prompt(),
            request.ratio_hint(),
            resolution_hint,
            model.class,
        );

        tracing::info!(
            model = %model.name,
            tier = %geometry.tier,
            ratio = %geometry.ratio,
            width = geometry.width,
            height = geometry.height,
            blend = request.reference_image().is_some(),
            "Starting generation"
        );

        self.ensure_credit(credential).await?;
        let uploaded = self.upload_reference(request).await?;
        let envelope = self
            .request_builder
            .build(request, &geometry, uploaded.as_ref());
        let handle = self.submitter.submit(&envelope, credential).await?;
        self.poller.wait(&handle, credential).await
    }

    /// Check the balance and try to claim the daily grant when it is empty.
    async fn ensure_credit(&self, credential: &Credential) -> Result<(), GenError> {
        let Some(service) = &self.credit_service else {
            return Ok(());
        };

        let balance = service.get_credit(credential).await?;
        if !balance.is_exhausted() {
            return Ok(());
        }

        tracing::info!(total = balance.total, "Credit balance empty, claiming daily credits");
        if let Err(error) = service.receive_credit(credential).await {
            tracing::warn!(error = %error, "Credit top-up failed, submitting anyway");
        }
        Ok(())
    }

    async fn upload_reference(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<UploadedImage>, GenError> {
        let Some(image) = request.reference_image() else {
            return Ok(None);
        };
        let uploader = self.uploader.as_ref().ok_or_else(|| {
            GenError::ConfigurationError(
                "a reference image was supplied but no uploader is configured".to_string(),
            )
        })?;

        match uploader.upload(request.credential(), image).await {
            Ok(uploaded) => {
                tracing::debug!(image_uri = %uploaded.image_uri, "Reference image uploaded");
                Ok(Some(uploaded))
            }
            Err(GenError::ReferenceUploadFailed(message)) => {
                Err(GenError::ReferenceUploadFailed(message))
            }
            Err(error) => Err(GenError::ReferenceUploadFailed(error.to_string())),
        }
    }

    /// Check the balance of every credential concurrently.
    pub async fn check_balances(
        &self,
        credentials: &[Credential],
    ) -> Result<Vec<Result<CreditBalance, GenError>>, GenError> {
        let service = self.credit_service.as_ref().ok_or_else(|| {
            GenError::ConfigurationError("no credit service is configured".to_string())
        })?;
        Ok(check_balances(service.as_ref(), credentials).await)
    }
}
