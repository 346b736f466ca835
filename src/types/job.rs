//! Job lifecycle types

use serde::{Deserialize, Serialize};

/// Status codes reported by the provider's history endpoint.
pub mod status {
    /// Accepted, not yet picked up
    pub const SUBMITTED: i64 = 20;
    /// Legacy terminal success
    pub const LEGACY_SUCCESS: i64 = 21;
    pub const FAILED: i64 = 30;
    pub const QUEUED: i64 = 42;
    pub const RENDERING: i64 = 45;
    pub const SUCCESS: i64 = 50;

    /// Codes meaning the job has not reached a terminal state.
    pub const PROCESSING: &[i64] = &[SUBMITTED, QUEUED, RENDERING];

    /// Fail code the provider uses for content-policy rejections.
    pub const CONTENT_FILTERED_FAIL_CODE: &str = "2038";

    pub fn is_processing(code: i64) -> bool {
        PROCESSING.contains(&code)
    }
}

/// Opaque polling key returned by submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    history_id: String,
}

impl JobHandle {
    pub fn new(history_id: impl Into<String>) -> Self {
        Self {
            history_id: history_id.into(),
        }
    }

    pub fn history_id(&self) -> &str {
        &self.history_id
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.history_id)
    }
}

/// One generated image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Primary high-resolution image URL
    pub image_url: Option<String>,
    /// Cover image used when the primary URL is absent
    pub cover_url: Option<String>,
}

impl ResultItem {
    /// Primary URL, else the cover URL.
    pub fn url(&self) -> Option<&str> {
        self.image_url.as_deref().or(self.cover_url.as_deref())
    }
}

/// Lifecycle phase derived from a [`JobStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Submitted,
    Processing,
    Succeeded,
    Failed,
    /// Terminal code without results, or an unknown code
    Unexpected,
}

/// Job status, updated in place on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub status: i64,
    pub fail_code: Option<String>,
    pub items: Vec<ResultItem>,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self {
            status: status::SUBMITTED,
            fail_code: None,
            items: Vec::new(),
        }
    }
}

impl JobStatus {
    /// Overwrite with the latest observation.
    pub fn apply(&mut self, status: i64, fail_code: Option<String>, items: Vec<ResultItem>) {
        self.status = status;
        self.fail_code = fail_code;
        self.items = items;
    }

    pub fn is_processing(&self) -> bool {
        status::is_processing(self.status)
    }

    /// Keep polling while processing with no results yet.
    pub fn should_continue(&self) -> bool {
        self.is_processing() && self.items.is_empty()
    }

    pub fn phase(&self) -> JobPhase {
        match self.status {
            status::FAILED => JobPhase::Failed,
            status::LEGACY_SUCCESS => JobPhase::Succeeded,
            _ if !self.items.is_empty() => JobPhase::Succeeded,
            status::SUBMITTED => JobPhase::Submitted,
            code if status::is_processing(code) => JobPhase::Processing,
            _ => JobPhase::Unexpected,
        }
    }

    pub fn is_content_filtered(&self) -> bool {
        self.fail_code.as_deref() == Some(status::CONTENT_FILTERED_FAIL_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> ResultItem {
        ResultItem {
            image_url: Some(url.to_string()),
            cover_url: None,
        }
    }

    #[test]
    fn phases_follow_status_and_items() {
        let mut job = JobStatus::default();
        assert_eq!(job.phase(), JobPhase::Submitted);
        assert!(job.should_continue());

        job.apply(status::RENDERING, None, vec![]);
        assert_eq!(job.phase(), JobPhase::Processing);

        job.apply(status::SUCCESS, None, vec![item("https://x/1.png")]);
        assert_eq!(job.phase(), JobPhase::Succeeded);
        assert!(!job.should_continue());

        job.apply(status::FAILED, Some("2038".into()), vec![]);
        assert_eq!(job.phase(), JobPhase::Failed);
        assert!(job.is_content_filtered());

        job.apply(status::SUCCESS, None, vec![]);
        assert_eq!(job.phase(), JobPhase::Unexpected);
    }

    #[test]
    fn processing_with_items_stops_polling() {
        let mut job = JobStatus::default();
        job.apply(status::QUEUED, None, vec![item("https://x/1.png")]);
        assert!(!job.should_continue());
        assert_eq!(job.phase(), JobPhase::Succeeded);
    }

    #[test]
    fn result_item_prefers_primary_url() {
        let both = ResultItem {
            image_url: Some("https://x/large.webp".into()),
            cover_url: Some("https://x/cover.webp".into()),
        };
        assert_eq!(both.url(), Some("https://x/large.webp"));

        let cover_only = ResultItem {
            image_url: None,
            cover_url: Some("https://x/cover.webp".into()),
        };
        assert_eq!(cover_only.url(), Some("https://x/cover.webp"));
        assert_eq!(ResultItem::default().url(), None);
    }
}
