//! Draft envelope and ability graph
//!
//! The provider accepts a versioned draft containing one image-base
//! component. The component's abilities are either a plain `generate`
//! ability or a reference-conditioned `blend` ability, never both, so the
//! two shapes are modelled as variants of [`Ability`].

use serde::Serialize;

use crate::error::GenError;
use crate::types::{ResolutionTier, ResolvedGeometry};

/// Draft schema version
pub const DRAFT_VERSION: &str = "3.2.8";
/// Oldest client version able to open the draft
pub const DRAFT_MIN_VERSION: &str = "3.0.2";
/// Strength applied to the uploaded reference in blend jobs
pub const BLEND_STRENGTH: f64 = 0.5;
/// Web platform code recorded in component metadata
pub const CREATED_PLATFORM: u8 = 3;

/// `type` + `id` pair carried by every structural node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeHeader {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
}

impl NodeHeader {
    pub fn new(kind: &'static str, id: String) -> Self {
        Self { kind, id }
    }

    /// Untyped node (`"type": ""`), the common case.
    pub fn plain(id: String) -> Self {
        Self::new("", id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftContent {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub min_version: &'static str,
    pub min_features: Vec<String>,
    pub is_from_tsn: bool,
    pub version: &'static str,
    pub main_component_id: String,
    pub component_list: Vec<ImageBaseComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBaseComponent {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub aigc_mode: &'static str,
    pub metadata: ComponentMetadata,
    pub generate_type: &'static str,
    pub abilities: AbilityRoot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMetadata {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub created_platform: u8,
    pub created_platform_version: &'static str,
    pub created_time_in_ms: String,
    pub created_did: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityRoot {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(flatten)]
    pub ability: Ability,
}

/// Exactly one generation shape per job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Text-to-image
    Generate(GenerateAbility),
    /// Reference-image-conditioned generation
    Blend(BlendAbility),
}

impl Ability {
    /// Value used for the component's `generate_type`.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Blend(_) => "blend",
        }
    }

    pub fn core_param(&self) -> &CoreParam {
        match self {
            Self::Generate(ability) => &ability.core_param,
            Self::Blend(ability) => &ability.core_param,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateAbility {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub core_param: CoreParam,
    pub history_option: NodeHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendAbility {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub min_features: Vec<String>,
    pub core_param: CoreParam,
    pub ability_list: Vec<BlendReference>,
    pub history_option: NodeHeader,
    pub prompt_placeholder_info_list: Vec<PromptPlaceholder>,
    pub postedit_param: PostEditParam,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreParam {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub model: String,
    pub prompt: String,
    pub negative_prompt: String,
    /// Only drawn for text-to-image jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub sample_strength: f64,
    pub image_ratio: u8,
    pub large_image_info: LargeImageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeImageInfo {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub height: u32,
    pub width: u32,
    pub resolution_type: ResolutionTier,
}

impl LargeImageInfo {
    pub fn from_geometry(id: String, geometry: &ResolvedGeometry) -> Self {
        Self {
            header: NodeHeader::plain(id),
            height: geometry.height,
            width: geometry.width,
            resolution_type: geometry.tier,
        }
    }
}

/// Sub-ability pointing the blend at the uploaded reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendReference {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub name: &'static str,
    pub image_uri_list: Vec<String>,
    pub image_list: Vec<ReferenceImageNode>,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceImageNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub source_from: &'static str,
    pub platform_type: u8,
    pub name: &'static str,
    pub image_uri: String,
    pub width: u32,
    pub height: u32,
    pub format: &'static str,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPlaceholder {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub ability_index: u32,
}

/// Post-edit marker; blend jobs always send `generate_type = 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostEditParam {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub generate_type: u8,
}

/// Request-level metrics, sent for text-to-image jobs only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsExtra {
    pub template_id: String,
    pub generate_count: u32,
    pub prompt_source: &'static str,
    pub template_source: String,
    pub last_request_id: String,
    pub origin_request_id: String,
}

impl Default for MetricsExtra {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            generate_count: 1,
            prompt_source: "custom",
            template_source: String::new(),
            last_request_id: String::new(),
            origin_request_id: String::new(),
        }
    }
}

/// Everything the submission call needs for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobEnvelope {
    pub submit_id: String,
    /// Provider model key
    pub root_model: String,
    pub assistant_id: u64,
    pub geometry: ResolvedGeometry,
    pub draft: DraftContent,
    pub metrics_extra: Option<MetricsExtra>,
}

impl JobEnvelope {
    /// The single image-base component.
    pub fn component(&self) -> Option<&ImageBaseComponent> {
        self.draft.component_list.first()
    }

    pub fn ability(&self) -> Option<&Ability> {
        self.component().map(|component| &component.abilities.ability)
    }

    pub fn is_blend(&self) -> bool {
        matches!(self.ability(), Some(Ability::Blend(_)))
    }

    /// Behaviour-analytics parameter, url-encoded JSON.
    pub fn babi_param(&self) -> Result<String, GenError> {
        let (feature_key, detail) = if self.is_blend() {
            (
                "to_image_referenceimage_generate",
                "to_image-referenceimage-byte_edit".to_string(),
            )
        } else {
            ("aigc_to_image", format!("to_image-{}", self.root_model))
        };
        let value = serde_json::json!({
            "scenario": "image_video_generation",
            "feature_key": feature_key,
            "feature_entrance": "to_image",
            "feature_entrance_detail": detail,
        });
        Ok(urlencoding::encode(&serde_json::to_string(&value)?).into_owned())
    }

    /// Query string pairs for the submission call.
    pub fn query_params(&self) -> Result<Vec<(String, String)>, GenError> {
        Ok(vec![("babi_param".to_string(), self.babi_param()?)])
    }

    /// JSON body for the submission call. Nested documents are sent as strings.
    pub fn to_body(&self) -> Result<serde_json::Value, GenError> {
        let mut body = serde_json::Map::new();
        body.insert(
            "extend".to_string(),
            serde_json::json!({ "root_model": self.root_model, "template_id": "" }),
        );
        body.insert("submit_id".to_string(), serde_json::json!(self.submit_id));
        if let Some(metrics) = &self.metrics_extra {
            body.insert(
                "metrics_extra".to_string(),
                serde_json::json!(serde_json::to_string(metrics)?),
            );
        }
        body.insert(
            "draft_content".to_string(),
            serde_json::json!(serde_json::to_string(&self.draft)?),
        );
        body.insert(
            "http_common_info".to_string(),
            serde_json::json!({ "aid": self.assistant_id }),
        );
        Ok(serde_json::Value::Object(body))
    }
}
