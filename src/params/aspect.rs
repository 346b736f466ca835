//! Aspect and resolution resolution.
//!
//! Ratio precedence: a valid caller hint wins, then a ratio found in the
//! prompt, then `1:1`. A hint of exactly `1:1` cannot be told apart from
//! "unset", so prompt detection may override it. That ambiguity is
//! long-standing provider-facing behavior and is kept as is.

use regex::Regex;

use crate::model_constants::ModelClass;
use crate::types::{AspectRatio, ResolutionTier, ResolvedGeometry};

lazy_static::lazy_static! {
    /// `<int>:<int>` with an ASCII or full-width colon.
    static ref RATIO_PATTERN: Regex =
        Regex::new(r"(\d{1,5})\s*[:：]\s*(\d{1,5})").expect("ratio pattern is valid");
    static ref LANDSCAPE_WORDS: Regex =
        Regex::new(r"(?i)\b(landscape|widescreen|wide)\b").expect("landscape pattern is valid");
    static ref PORTRAIT_WORDS: Regex =
        Regex::new(r"(?i)\b(portrait|vertical)\b").expect("portrait pattern is valid");
    static ref SQUARE_WORDS: Regex =
        Regex::new(r"(?i)\bsquare\b").expect("square pattern is valid");
}

// CJK text has no word boundaries; these match as substrings.
const LANDSCAPE_KEYWORDS: &[&str] = &["横屏", "横版", "宽屏"];
const PORTRAIT_KEYWORDS: &[&str] = &["竖屏", "竖版"];
const SQUARE_KEYWORDS: &[&str] = &["正方形", "方形", "方图"];

const TABLE_2K: [(AspectRatio, u32, u32); 8] = [
    (AspectRatio::Square, 2048, 2048),
    (AspectRatio::Standard, 2304, 1728),
    (AspectRatio::StandardPortrait, 1728, 2304),
    (AspectRatio::Widescreen, 2560, 1440),
    (AspectRatio::Vertical, 1440, 2560),
    (AspectRatio::Landscape, 2496, 1664),
    (AspectRatio::Portrait, 1664, 2496),
    (AspectRatio::Ultrawide, 3024, 1296),
];

const TABLE_1K: [(AspectRatio, u32, u32); 8] = [
    (AspectRatio::Square, 1328, 1328),
    (AspectRatio::Standard, 1472, 1104),
    (AspectRatio::StandardPortrait, 1104, 1472),
    (AspectRatio::Widescreen, 1664, 936),
    (AspectRatio::Vertical, 936, 1664),
    (AspectRatio::Landscape, 1584, 1056),
    (AspectRatio::Portrait, 1056, 1584),
    (AspectRatio::Ultrawide, 2016, 864),
];

/// Derive output geometry from the prompt, caller hints and model class.
pub fn resolve(
    prompt: &str,
    ratio_hint: Option<&str>,
    resolution_hint: Option<&str>,
    class: ModelClass,
) -> ResolvedGeometry {
    let tier = select_tier(resolution_hint, class);
    let hinted = ratio_hint.and_then(AspectRatio::from_code);

    let ratio = match hinted {
        Some(ratio) if ratio != AspectRatio::Square => ratio,
        // "1:1" and "unset" look the same here; detection gets a say.
        _ => detect_ratio(prompt).or(hinted).unwrap_or(AspectRatio::Square),
    };

    let (width, height) = dimensions(ratio, tier);
    tracing::debug!(ratio = %ratio, tier = %tier, width, height, "Resolved output geometry");

    ResolvedGeometry {
        ratio,
        width,
        height,
        tier,
    }
}

/// Find a supported ratio in free text: numeric tokens first, then keywords.
pub fn detect_ratio(prompt: &str) -> Option<AspectRatio> {
    let numeric = RATIO_PATTERN.captures_iter(prompt).find_map(|caps| {
        let width: u32 = caps.get(1)?.as_str().parse().ok()?;
        let height: u32 = caps.get(2)?.as_str().parse().ok()?;
        AspectRatio::from_code(&format!("{width}:{height}"))
    });
    if numeric.is_some() {
        return numeric;
    }

    let mentions = |words: &Regex, keywords: &[&str]| {
        words.is_match(prompt) || keywords.iter().any(|k| prompt.contains(k))
    };

    if mentions(&LANDSCAPE_WORDS, LANDSCAPE_KEYWORDS) {
        Some(AspectRatio::Widescreen)
    } else if mentions(&PORTRAIT_WORDS, PORTRAIT_KEYWORDS) {
        Some(AspectRatio::Vertical)
    } else if mentions(&SQUARE_WORDS, SQUARE_KEYWORDS) {
        Some(AspectRatio::Square)
    } else {
        None
    }
}

/// Pick the resolution tier for a model class.
pub fn select_tier(resolution_hint: Option<&str>, class: ModelClass) -> ResolutionTier {
    let hinted = resolution_hint.and_then(ResolutionTier::parse);

    match class {
        ModelClass::Legacy => {
            if let Some(requested) = resolution_hint
                && hinted != Some(ResolutionTier::OneK)
            {
                tracing::warn!(
                    requested = %requested,
                    "Model only supports 1k output, ignoring requested resolution"
                );
            }
            ResolutionTier::OneK
        }
        ModelClass::Standard => hinted.unwrap_or(ResolutionTier::OneK),
        ModelClass::Modern => hinted.unwrap_or(ResolutionTier::TwoK),
    }
}

/// Fixed pixel dimensions for a ratio at a tier, as `(width, height)`.
pub fn dimensions(ratio: AspectRatio, tier: ResolutionTier) -> (u32, u32) {
    let table = match tier {
        ResolutionTier::OneK => &TABLE_1K,
        ResolutionTier::TwoK => &TABLE_2K,
    };
    table
        .iter()
        .find(|(entry, _, _)| *entry == ratio)
        .map(|(_, width, height)| (*width, *height))
        .unwrap_or((table[0].1, table[0].2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn every_ratio_and_tier_maps_to_its_fixed_dimensions() {
        let expected: [(&str, ResolutionTier, u32, u32); 16] = [
            ("21:9", ResolutionTier::TwoK, 3024, 1296),
            ("16:9", ResolutionTier::TwoK, 2560, 1440),
            ("3:2", ResolutionTier::TwoK, 2496, 1664),
            ("4:3", ResolutionTier::TwoK, 2304, 1728),
            ("1:1", ResolutionTier::TwoK, 2048, 2048),
            ("3:4", ResolutionTier::TwoK, 1728, 2304),
            ("2:3", ResolutionTier::TwoK, 1664, 2496),
            ("9:16", ResolutionTier::TwoK, 1440, 2560),
            ("21:9", ResolutionTier::OneK, 2016, 864),
            ("16:9", ResolutionTier::OneK, 1664, 936),
            ("3:2", ResolutionTier::OneK, 1584, 1056),
            ("4:3", ResolutionTier::OneK, 1472, 1104),
            ("1:1", ResolutionTier::OneK, 1328, 1328),
            ("3:4", ResolutionTier::OneK, 1104, 1472),
            ("2:3", ResolutionTier::OneK, 1056, 1584),
            ("9:16", ResolutionTier::OneK, 936, 1664),
        ];

        for (code, tier, width, height) in expected {
            let geometry = resolve("plain prompt", Some(code), Some(tier.as_str()), ModelClass::Modern);
            assert_eq!(geometry.ratio.as_str(), code);
            assert_eq!(geometry.tier, tier);
            assert_eq!((geometry.width, geometry.height), (width, height), "{code} @ {tier}");
        }
    }

    #[test]
    fn prompt_ratio_is_detected_without_hint() {
        let geometry = resolve("a cat 16:9 wide", None, None, ModelClass::Modern);
        assert_eq!(geometry.ratio, AspectRatio::Widescreen);
    }

    #[test]
    fn explicit_hint_wins_over_prompt_ratio() {
        let geometry = resolve("a cat 16:9 wide", Some("4:3"), None, ModelClass::Modern);
        assert_eq!(geometry.ratio, AspectRatio::Standard);
    }

    /// A literal "1:1" hint is indistinguishable from "no hint", so a ratio
    /// mentioned in the prompt replaces it. This asserts the current behavior.
    #[test]
    fn square_hint_is_overridden_by_prompt_ratio() {
        let geometry = resolve("a cat 16:9 wide", Some("1:1"), None, ModelClass::Modern);
        assert_eq!(geometry.ratio, AspectRatio::Widescreen);

        let geometry = resolve("a cat on a mat", Some("1:1"), None, ModelClass::Modern);
        assert_eq!(geometry.ratio, AspectRatio::Square);
    }

    #[test]
    fn invalid_hint_falls_back_to_detection_then_square() {
        assert_eq!(
            resolve("poster 2:3", Some("5:4"), None, ModelClass::Modern).ratio,
            AspectRatio::Portrait
        );
        assert_eq!(
            resolve("no ratio here", Some("banana"), None, ModelClass::Modern).ratio,
            AspectRatio::Square
        );
    }

    #[test]
    fn numeric_detection_skips_unsupported_pairs_and_accepts_full_width_colon() {
        assert_eq!(detect_ratio("at 10:30 in 9：16"), Some(AspectRatio::Vertical));
        assert_eq!(detect_ratio("ratio 04:03"), Some(AspectRatio::Standard));
        assert_eq!(detect_ratio("time 12:45"), None);
    }

    #[test]
    fn keyword_groups_map_to_fixed_codes() {
        assert_eq!(detect_ratio("一张横屏壁纸"), Some(AspectRatio::Widescreen));
        assert_eq!(detect_ratio("Portrait of a knight"), Some(AspectRatio::Vertical));
        assert_eq!(detect_ratio("square album cover"), Some(AspectRatio::Square));
        assert_eq!(detect_ratio("a bowl of fruit"), None);
    }

    #[test]
    fn english_keywords_only_match_whole_words() {
        assert_eq!(detect_ratio("a worldwide map"), None);
        assert_eq!(detect_ratio("widen the smile of the girl"), None);
        assert_eq!(detect_ratio("x squared over two"), None);
        assert_eq!(detect_ratio("a WIDE shot of the valley"), Some(AspectRatio::Widescreen));
        assert_eq!(detect_ratio("vertical, neon sign"), Some(AspectRatio::Vertical));
    }

    #[test]
    fn square_hint_survives_words_containing_keywords() {
        let geometry = resolve("a worldwide map", Some("1:1"), None, ModelClass::Modern);
        assert_eq!(geometry.ratio, AspectRatio::Square);
        assert_eq!((geometry.width, geometry.height), (2048, 2048));
    }

    #[test]
    fn numeric_ratio_beats_keywords() {
        assert_eq!(detect_ratio("portrait 16:9"), Some(AspectRatio::Widescreen));
    }

    #[test]
    fn tier_defaults_depend_on_model_class() {
        assert_eq!(select_tier(None, ModelClass::Modern), ResolutionTier::TwoK);
        assert_eq!(select_tier(None, ModelClass::Standard), ResolutionTier::OneK);
        assert_eq!(select_tier(Some("2k"), ModelClass::Standard), ResolutionTier::TwoK);
        assert_eq!(select_tier(Some("8k"), ModelClass::Modern), ResolutionTier::TwoK);
    }

    #[test]
    #[traced_test]
    fn legacy_models_force_1k_and_warn() {
        assert_eq!(select_tier(Some("2k"), ModelClass::Legacy), ResolutionTier::OneK);
        assert!(logs_contain("only supports 1k"));
    }

    #[test]
    fn legacy_geometry_uses_1k_table() {
        let geometry = resolve("a cat", Some("16:9"), Some("2k"), ModelClass::Legacy);
        assert_eq!(geometry.tier, ResolutionTier::OneK);
        assert_eq!((geometry.width, geometry.height), (1664, 936));
    }
}
