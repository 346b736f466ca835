//! Output geometry types

use serde::{Deserialize, Serialize};

/// Supported aspect codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "21:9")]
    Ultrawide,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "3:2")]
    Landscape,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    StandardPortrait,
    #[serde(rename = "2:3")]
    Portrait,
    #[serde(rename = "9:16")]
    Vertical,
}

impl AspectRatio {
    /// All supported codes, widest first.
    pub const ALL: [AspectRatio; 8] = [
        Self::Ultrawide,
        Self::Widescreen,
        Self::Landscape,
        Self::Standard,
        Self::Square,
        Self::StandardPortrait,
        Self::Portrait,
        Self::Vertical,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrawide => "21:9",
            Self::Widescreen => "16:9",
            Self::Landscape => "3:2",
            Self::Standard => "4:3",
            Self::Square => "1:1",
            Self::StandardPortrait => "3:4",
            Self::Portrait => "2:3",
            Self::Vertical => "9:16",
        }
    }

    /// Parse a normalized `W:H` code. Surrounding whitespace is ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == code)
    }

    /// Numeric ratio identifier the provider expects in `core_param.image_ratio`.
    pub const fn provider_id(&self) -> u8 {
        match self {
            Self::Square => 1,
            Self::StandardPortrait => 2,
            Self::Widescreen => 3,
            Self::Standard => 4,
            Self::Vertical => 5,
            Self::Portrait => 6,
            Self::Landscape => 7,
            Self::Ultrawide => 8,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution class governing pixel dimensions and credit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[serde(rename = "1k")]
    OneK,
    #[serde(rename = "2k")]
    TwoK,
}

impl ResolutionTier {
    /// Tiers ordered from highest to lowest.
    pub const DESCENDING: [ResolutionTier; 2] = [Self::TwoK, Self::OneK];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1k",
            Self::TwoK => "2k",
        }
    }

    /// Parse `"1k"` / `"2k"` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1k" => Some(Self::OneK),
            "2k" => Some(Self::TwoK),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output geometry derived from a request and the model class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    pub ratio: AspectRatio,
    pub width: u32,
    pub height: u32,
    pub tier: ResolutionTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_codes_parse_back() {
        for ratio in AspectRatio::ALL {
            assert_eq!(AspectRatio::from_code(ratio.as_str()), Some(ratio));
        }
        assert_eq!(AspectRatio::from_code(" 16:9 "), Some(AspectRatio::Widescreen));
        assert_eq!(AspectRatio::from_code("5:4"), None);
    }

    #[test]
    fn provider_ids_are_distinct() {
        let mut ids: Vec<u8> = AspectRatio::ALL.iter().map(|r| r.provider_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn tiers_parse_case_insensitively() {
        assert_eq!(ResolutionTier::parse("2K"), Some(ResolutionTier::TwoK));
        assert_eq!(ResolutionTier::parse("1k"), Some(ResolutionTier::OneK));
        assert_eq!(ResolutionTier::parse("4k"), None);
        assert_eq!(
            serde_json::to_value(ResolutionTier::TwoK).unwrap(),
            serde_json::json!("2k")
        );
    }
}
