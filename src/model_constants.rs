//! Model Constants
//!
//! Public model names, the provider model keys they map to, and the
//! capability class that decides how resolution tiers are chosen.
//!
//! # Model Classes
//!
//! - **Modern**: 4.x models, default tier 2k
//! - **Standard**: 3.x models, default tier 1k, caller hint honored
//! - **Legacy**: 2.x and older, fixed at 1k

// ============================================================================
// Public Model Names
// ============================================================================

pub const JIMENG_4_0: &str = "jimeng-4.0";
pub const JIMENG_3_1: &str = "jimeng-3.1";
pub const JIMENG_3_0: &str = "jimeng-3.0";
pub const JIMENG_2_1: &str = "jimeng-2.1";
pub const JIMENG_2_0_PRO: &str = "jimeng-2.0-pro";
pub const JIMENG_2_0: &str = "jimeng-2.0";
pub const JIMENG_1_4: &str = "jimeng-1.4";
pub const JIMENG_XL_PRO: &str = "jimeng-xl-pro";

/// Model used when the caller does not name one, or names an unknown one
pub const DEFAULT_MODEL: &str = JIMENG_4_0;

/// All public model names
pub const ALL: &[&str] = &[
    JIMENG_4_0,
    JIMENG_3_1,
    JIMENG_3_0,
    JIMENG_2_1,
    JIMENG_2_0_PRO,
    JIMENG_2_0,
    JIMENG_1_4,
    JIMENG_XL_PRO,
];

// ============================================================================
// Capability Classes
// ============================================================================

/// How a model family treats resolution tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelClass {
    /// Fixed 1k output; tier hints are ignored
    Legacy,
    /// Tier hint honored, defaults to 1k
    Standard,
    /// Tier hint honored, defaults to 2k
    Modern,
}

/// Resolved catalog entry for a public model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Public name (after default fallback)
    pub name: &'static str,
    /// Provider-side model key sent as `core_param.model`
    pub provider_key: &'static str,
    pub class: ModelClass,
}

const CATALOG: &[ModelSpec] = &[
    ModelSpec {
        name: JIMENG_4_0,
        provider_key: "high_aes_general_v40",
        class: ModelClass::Modern,
    },
    ModelSpec {
        name: JIMENG_3_1,
        provider_key: "high_aes_general_v30l_art_fangzhou:general_v3.0_18b",
        class: ModelClass::Standard,
    },
    ModelSpec {
        name: JIMENG_3_0,
        provider_key: "high_aes_general_v30l:general_v3.0_18b",
        class: ModelClass::Standard,
    },
    ModelSpec {
        name: JIMENG_2_1,
        provider_key: "high_aes_general_v21_L:general_v2.1_L",
        class: ModelClass::Legacy,
    },
    ModelSpec {
        name: JIMENG_2_0_PRO,
        provider_key: "high_aes_general_v20_L:general_v2.0_L",
        class: ModelClass::Legacy,
    },
    ModelSpec {
        name: JIMENG_2_0,
        provider_key: "high_aes_general_v20:general_v2.0",
        class: ModelClass::Legacy,
    },
    ModelSpec {
        name: JIMENG_1_4,
        provider_key: "high_aes_general_v14:general_v1.4",
        class: ModelClass::Legacy,
    },
    ModelSpec {
        name: JIMENG_XL_PRO,
        provider_key: "text2img_xl_sft",
        class: ModelClass::Legacy,
    },
];

/// Look up a model, falling back to [`DEFAULT_MODEL`] for unknown names.
pub fn lookup(model: &str) -> ModelSpec {
    let wanted = model.trim();
    CATALOG
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
        .or_else(|| CATALOG.iter().find(|spec| spec.name == DEFAULT_MODEL))
        .copied()
        .unwrap_or(CATALOG[0])
}

/// Exact lookup without fallback.
pub fn find(model: &str) -> Option<ModelSpec> {
    let wanted = model.trim();
    CATALOG
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
        .copied()
}
