//! Client Builder
//!
//! Builder pattern implementation for creating [`DreamgenClient`]s.

use std::sync::Arc;
use std::time::Duration;

use crate::client::DreamgenClient;
use crate::config::{ClientConfig, PollConfig};
use crate::error::GenError;
use crate::executors::HttpCreditService;
use crate::traits::{CreditService, ReferenceUploader};
use crate::transport::{HttpTransport, Transport};
use crate::types::ResolutionTier;
use crate::utils::{Clock, IdGenerator, SeedSource, UuidIdGenerator};

/// Generation client builder
#[derive(Default)]
pub struct DreamgenBuilder {
    config: ClientConfig,
    base_url: Option<String>,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn Transport>>,
    uploader: Option<Arc<dyn ReferenceUploader>>,
    credit_service: Option<Arc<dyn CreditService>>,
    http_credits: Option<bool>,
    ids: Option<Arc<dyn IdGenerator>>,
    seeds: Option<SeedSource>,
    clock: Option<Arc<dyn Clock>>,
}

impl DreamgenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. Takes precedence over `DREAMGEN_BASE_URL`.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn assistant_id(mut self, assistant_id: u64) -> Self {
        self.config.assistant_id = assistant_id;
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = Some(connect_timeout);
        self
    }

    /// Delay before each status query
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll.interval = interval;
        self
    }

    /// Status queries issued before a job times out
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.config.poll.max_attempts = attempts;
        self
    }

    pub fn poll_config(mut self, poll: PollConfig) -> Self {
        self.config.poll = poll;
        self
    }

    /// Resolution tiers to try, highest first
    pub fn tiers(mut self, tiers: Vec<ResolutionTier>) -> Self {
        self.config.tiers = tiers;
        self
    }

    /// Use a preconfigured `reqwest` client for the HTTP transport
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the HTTP transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn uploader(mut self, uploader: Arc<dyn ReferenceUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn credit_service(mut self, service: Arc<dyn CreditService>) -> Self {
        self.credit_service = Some(service);
        self
    }

    /// Check and top up credits through the provider's commerce endpoints.
    ///
    /// On by default; ignored when a custom credit service is set.
    pub fn http_credits(mut self, enabled: bool) -> Self {
        self.http_credits = Some(enabled);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn seed_source(mut self, seeds: SeedSource) -> Self {
        self.seeds = Some(seeds);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DreamgenClient, GenError> {
        let mut config = self.config;
        config.base_url = resolve_base_url(self.base_url, |key| std::env::var(key).ok());
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => build_http_client(&config)?,
                };
                Arc::new(HttpTransport::new(
                    http_client,
                    config.base_url.clone(),
                    config.assistant_id,
                ))
            }
        };

        let credit_service = match (self.credit_service, self.http_credits.unwrap_or(true)) {
            (Some(service), _) => Some(service),
            (None, true) => {
                Some(Arc::new(HttpCreditService::new(transport.clone())) as Arc<dyn CreditService>)
            }
            (None, false) => None,
        };

        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidIdGenerator));

        let mut client = DreamgenClient::new(config, transport, ids);
        if let Some(uploader) = self.uploader {
            client = client.with_uploader(uploader);
        }
        if let Some(service) = credit_service {
            client = client.with_credit_service(service);
        }
        if let Some(seeds) = self.seeds {
            client = client.with_seed_source(seeds);
        }
        if let Some(clock) = self.clock {
            client = client.with_clock(clock);
        }
        Ok(client)
    }
}

/// Explicit value, then the environment, then the default.
fn resolve_base_url<F>(explicit: Option<String>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .or_else(|| lookup(ClientConfig::BASE_URL_ENV).filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| ClientConfig::DEFAULT_BASE_URL.to_string())
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, GenError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    builder
        .build()
        .map_err(|e| GenError::ConfigurationError(format!("failed to build HTTP client: {e}")))
}
