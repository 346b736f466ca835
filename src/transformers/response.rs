//! Response transformation
//!
//! Extracts job handles and job records from provider payloads (the `data`
//! part of the envelope, already unwrapped by the transport).

use serde::{Deserialize, Deserializer};

use crate::error::GenError;
use crate::types::{JobHandle, ResultItem};

/// Accept a string or a number and keep it as a string. Empty strings become `None`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Job record as reported by the history endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub status: i64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub fail_code: Option<String>,
    #[serde(default)]
    pub item_list: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub image: Option<ItemImage>,
    #[serde(default)]
    pub common_attr: Option<CommonAttr>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemImage {
    #[serde(default)]
    pub large_images: Vec<LargeImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LargeImage {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonAttr {
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl From<HistoryItem> for ResultItem {
    fn from(item: HistoryItem) -> Self {
        let image_url = item
            .image
            .and_then(|image| image.large_images.into_iter().next())
            .and_then(|large| large.image_url)
            .filter(|url| !url.is_empty());
        let cover_url = item
            .common_attr
            .and_then(|attr| attr.cover_url)
            .filter(|url| !url.is_empty());
        Self {
            image_url,
            cover_url,
        }
    }
}

impl HistoryRecord {
    /// Convert items to result items, preserving provider order.
    pub fn result_items(&self) -> Vec<ResultItem> {
        self.item_list.iter().cloned().map(ResultItem::from).collect()
    }
}

/// Extract the history id from a submission response.
pub fn extract_job_handle(data: &serde_json::Value) -> Result<JobHandle, GenError> {
    let id = match data.pointer("/aigc_data/history_record_id") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => {
            return Err(GenError::GenerationFailed(
                "submission response does not contain a history record id".to_string(),
            ));
        }
    };
    Ok(JobHandle::new(id))
}

/// Look up the record for `history_id` in a status response.
///
/// `Ok(None)` means the provider no longer knows the job.
pub fn extract_history_record(
    data: &serde_json::Value,
    history_id: &str,
) -> Result<Option<HistoryRecord>, GenError> {
    match data.get(history_id) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| GenError::ParseError(format!("invalid history record: {e}"))),
    }
}
