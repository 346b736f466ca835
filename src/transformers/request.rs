//! Job request building
//!
//! Converts a [`GenerationRequest`] plus resolved geometry into the draft
//! envelope the provider expects. Identifiers, seeds and timestamps come from
//! injected sources so the shape can be asserted exactly.

use std::sync::Arc;

use super::draft::{
    Ability, AbilityRoot, BLEND_STRENGTH, BlendAbility, BlendReference, CREATED_PLATFORM,
    ComponentMetadata, CoreParam, DRAFT_MIN_VERSION, DRAFT_VERSION, DraftContent,
    GenerateAbility, ImageBaseComponent, JobEnvelope, LargeImageInfo, MetricsExtra, NodeHeader,
    PostEditParam, PromptPlaceholder, ReferenceImageNode,
};
use crate::config::ClientConfig;
use crate::model_constants;
use crate::types::{GenerationRequest, ResolvedGeometry, UploadedImage};
use crate::utils::{Clock, IdGenerator, SeedSource, SystemClock, random_seed};

/// Provider convention: blend prompts are prefixed with `##`.
const BLEND_PROMPT_PREFIX: &str = "##";

/// Builds [`JobEnvelope`]s.
#[derive(Clone)]
pub struct JobRequestBuilder {
    ids: Arc<dyn IdGenerator>,
    seeds: SeedSource,
    clock: Arc<dyn Clock>,
    assistant_id: u64,
}

impl JobRequestBuilder {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            seeds: Arc::new(random_seed),
            clock: Arc::new(SystemClock),
            assistant_id: ClientConfig::DEFAULT_ASSISTANT_ID,
        }
    }

    pub fn with_seed_source(mut self, seeds: SeedSource) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_assistant_id(mut self, assistant_id: u64) -> Self {
        self.assistant_id = assistant_id;
        self
    }

    /// Build the envelope. A reference selects the blend shape.
    pub fn build(
        &self,
        request: &GenerationRequest,
        geometry: &ResolvedGeometry,
        reference: Option<&UploadedImage>,
    ) -> JobEnvelope {
        let model = model_constants::lookup(request.model());
        let component_id = self.next_id();

        let ability = match reference {
            Some(image) => Ability::Blend(self.blend_ability(
                request,
                model.provider_key,
                geometry,
                image,
            )),
            None => {
                Ability::Generate(self.generate_ability(request, model.provider_key, geometry))
            }
        };

        let component = ImageBaseComponent {
            header: NodeHeader::new("image_base_component", component_id.clone()),
            aigc_mode: "workbench",
            metadata: ComponentMetadata {
                header: NodeHeader::plain(self.next_id()),
                created_platform: CREATED_PLATFORM,
                created_platform_version: "",
                created_time_in_ms: self.clock.now_millis().to_string(),
                created_did: "",
            },
            generate_type: ability.kind(),
            abilities: AbilityRoot {
                header: NodeHeader::plain(self.next_id()),
                ability,
            },
        };

        let draft = DraftContent {
            header: NodeHeader::new("draft", self.next_id()),
            min_version: DRAFT_MIN_VERSION,
            min_features: Vec::new(),
            is_from_tsn: true,
            version: DRAFT_VERSION,
            main_component_id: component_id,
            component_list: vec![component],
        };

        let metrics_extra = reference.is_none().then(MetricsExtra::default);

        JobEnvelope {
            submit_id: self.next_id(),
            root_model: model.provider_key.to_string(),
            assistant_id: self.assistant_id,
            geometry: *geometry,
            draft,
            metrics_extra,
        }
    }

    fn next_id(&self) -> String {
        self.ids.next_id()
    }

    fn core_param(
        &self,
        model_key: &str,
        prompt: String,
        request: &GenerationRequest,
        geometry: &ResolvedGeometry,
        seed: Option<u64>,
    ) -> CoreParam {
        CoreParam {
            header: NodeHeader::plain(self.next_id()),
            model: model_key.to_string(),
            prompt,
            negative_prompt: request.negative_prompt().to_string(),
            seed,
            sample_strength: request.sample_strength(),
            image_ratio: geometry.ratio.provider_id(),
            large_image_info: LargeImageInfo::from_geometry(self.next_id(), geometry),
        }
    }

    fn generate_ability(
        &self,
        request: &GenerationRequest,
        model_key: &str,
        geometry: &ResolvedGeometry,
    ) -> GenerateAbility {
        let seed = (self.seeds)();
        GenerateAbility {
            header: NodeHeader::plain(self.next_id()),
            core_param: self.core_param(
                model_key,
                request.prompt().to_string(),
                request,
                geometry,
                Some(seed),
            ),
            history_option: NodeHeader::plain(self.next_id()),
        }
    }

    fn blend_ability(
        &self,
        request: &GenerationRequest,
        model_key: &str,
        geometry: &ResolvedGeometry,
        image: &UploadedImage,
    ) -> BlendAbility {
        let prompt = format!("{BLEND_PROMPT_PREFIX}{}", request.prompt());
        BlendAbility {
            header: NodeHeader::plain(self.next_id()),
            min_features: Vec::new(),
            core_param: self.core_param(model_key, prompt, request, geometry, None),
            ability_list: vec![BlendReference {
                header: NodeHeader::plain(self.next_id()),
                name: "byte_edit",
                image_uri_list: vec![image.image_uri.clone()],
                image_list: vec![ReferenceImageNode {
                    header: NodeHeader::new("image", self.next_id()),
                    source_from: "upload",
                    platform_type: 1,
                    name: "",
                    image_uri: image.image_uri.clone(),
                    width: 0,
                    height: 0,
                    format: "",
                    uri: image.image_uri.clone(),
                }],
                strength: BLEND_STRENGTH,
            }],
            history_option: NodeHeader::plain(self.next_id()),
            prompt_placeholder_info_list: vec![PromptPlaceholder {
                header: NodeHeader::plain(self.next_id()),
                ability_index: 0,
            }],
            postedit_param: PostEditParam {
                header: NodeHeader::plain(self.next_id()),
                generate_type: 0,
            },
        }
    }
}
