//! Message-based balance detection.
//!
//! Collaborators do not always classify their failures. When an insufficient
//! balance surfaces only as text inside a generic API error, the resilience
//! wrapper falls back to these substring checks. Structured classification in
//! [`GenError::failure_class`](super::GenError::failure_class) always wins.

/// Provider `ret` codes known to signal an exhausted credit balance.
pub const INSUFFICIENT_CREDIT_CODES: &[&str] = &["1006"];

/// Phrases providers use when the balance is too low.
const INSUFFICIENT_CREDIT_PHRASES: &[&str] = &[
    "积分不足",
    "insufficient credit",
    "insufficient balance",
    "not enough credit",
];

/// Returns true when a provider `ret` code is a known balance code.
pub fn is_insufficient_credit_code(code: &str) -> bool {
    INSUFFICIENT_CREDIT_CODES.contains(&code.trim())
}

/// Returns true when a free-form error message looks like a balance failure.
pub fn message_signals_insufficient_credits(message: &str) -> bool {
    let lowered = message.to_lowercase();
    if INSUFFICIENT_CREDIT_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        return true;
    }

    // Bare numeric codes must stand alone, otherwise "history 210068" would match.
    lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(is_insufficient_credit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_phrases() {
        assert!(message_signals_insufficient_credits("请求失败: 积分不足"));
        assert!(message_signals_insufficient_credits(
            "Insufficient Credit for this account"
        ));
    }

    #[test]
    fn matches_standalone_codes_only() {
        assert!(message_signals_insufficient_credits("[ret=1006] denied"));
        assert!(!message_signals_insufficient_credits("history 1006123 failed"));
        assert!(!message_signals_insufficient_credits("upstream timeout"));
    }
}
