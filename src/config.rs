//! Client Configuration
//!
//! Configuration structures for the generation client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GenError;
use crate::types::ResolutionTier;

/// One pre-rendered variant requested alongside each status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageScene {
    pub scene: String,
    pub width: u32,
    pub height: u32,
    pub uniq_key: String,
    pub format: String,
}

impl ImageScene {
    pub fn new(scene: &str, width: u32, height: u32, format: &str) -> Self {
        Self {
            scene: scene.to_string(),
            width,
            height,
            uniq_key: format!("{scene}-w:{width}-h:{height}"),
            format: format.to_string(),
        }
    }
}

/// Rendition profile sent as `image_info` in status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionProfile {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub image_scene_list: Vec<ImageScene>,
}

impl Default for RenditionProfile {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            format: "webp".to_string(),
            image_scene_list: vec![
                ImageScene::new("smart_crop", 360, 360, "webp"),
                ImageScene::new("smart_crop", 480, 480, "webp"),
                ImageScene::new("smart_crop", 720, 720, "webp"),
                ImageScene::new("smart_crop", 720, 480, "webp"),
                ImageScene::new("smart_crop", 360, 240, "webp"),
                ImageScene::new("smart_crop", 240, 320, "webp"),
                ImageScene::new("smart_crop", 480, 640, "webp"),
                ImageScene::new("normal", 2400, 2400, "webp"),
                ImageScene::new("normal", 1080, 1080, "webp"),
                ImageScene::new("normal", 720, 720, "webp"),
                ImageScene::new("normal", 480, 480, "webp"),
                ImageScene::new("normal", 360, 360, "webp"),
            ],
        }
    }
}

/// Polling behaviour for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay before every status query
    pub interval: Duration,
    /// Status queries issued before giving up
    pub max_attempts: u32,
    pub rendition: RenditionProfile,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            rendition: RenditionProfile::default(),
        }
    }
}

/// Generation client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the provider's web API
    pub base_url: String,
    /// Application id sent with every call
    pub assistant_id: u64,
    /// HTTP request timeout
    pub timeout: Option<Duration>,
    /// HTTP connect timeout
    pub connect_timeout: Option<Duration>,
    pub poll: PollConfig,
    /// Resolution tiers, highest first
    pub tiers: Vec<ResolutionTier>,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://jimeng.jianying.com";

    pub const DEFAULT_ASSISTANT_ID: u64 = 513695;

    /// Environment variable overriding the default base URL
    pub const BASE_URL_ENV: &'static str = "DREAMGEN_BASE_URL";

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<ResolutionTier>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GenError> {
        if self.base_url.trim().is_empty() {
            return Err(GenError::ConfigurationError(
                "base URL cannot be empty".to_string(),
            ));
        }

        if self.poll.max_attempts == 0 {
            return Err(GenError::ConfigurationError(
                "max poll attempts must be at least 1".to_string(),
            ));
        }

        if self.tiers.is_empty() {
            return Err(GenError::ConfigurationError(
                "resolution tier list cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            assistant_id: Self::DEFAULT_ASSISTANT_ID,
            timeout: Some(Self::DEFAULT_TIMEOUT),
            connect_timeout: None,
            poll: PollConfig::default(),
            tiers: ResolutionTier::DESCENDING.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.max_attempts, 120);
        assert_eq!(
            config.tiers,
            vec![ResolutionTier::TwoK, ResolutionTier::OneK]
        );
    }

    #[test]
    fn validation_rejects_unusable_settings() {
        let empty_url = ClientConfig::default().with_base_url("  ");
        assert!(matches!(
            empty_url.validate(),
            Err(GenError::ConfigurationError(_))
        ));

        let no_attempts = ClientConfig::default().with_poll(PollConfig::default().with_max_attempts(0));
        assert!(no_attempts.validate().is_err());

        let no_tiers = ClientConfig::default().with_tiers(vec![]);
        assert!(no_tiers.validate().is_err());
    }

    #[test]
    fn rendition_keys_are_unique() {
        let profile = RenditionProfile::default();
        let mut keys: Vec<&str> = profile
            .image_scene_list
            .iter()
            .map(|s| s.uniq_key.as_str())
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), profile.image_scene_list.len());
    }
}
