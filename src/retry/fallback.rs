//! Resolution tier fallback
//!
//! Runs the whole generation pipeline at the highest usable tier and, when
//! the account cannot pay for it, re-runs it from scratch one tier lower.
//! Attempts are strictly sequential. Only insufficient-credit failures
//! advance the tier; everything else is returned as is.

use std::future::Future;

use crate::error::GenError;
use crate::types::ResolutionTier;

/// Ordered tier list, highest first.
#[derive(Debug, Clone)]
pub struct TierFallback {
    tiers: Vec<ResolutionTier>,
}

impl Default for TierFallback {
    fn default() -> Self {
        Self::new(ResolutionTier::DESCENDING.to_vec())
    }
}

impl TierFallback {
    pub fn new(tiers: Vec<ResolutionTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[ResolutionTier] {
        &self.tiers
    }

    /// Tiers to try, starting at `start` when it is in the list, else at the top.
    pub fn plan(&self, start: Option<ResolutionTier>) -> &[ResolutionTier] {
        let offset = start
            .and_then(|tier| self.tiers.iter().position(|t| *t == tier))
            .unwrap_or(0);
        &self.tiers[offset..]
    }

    /// Run `operation` once per tier until it succeeds or fails for a
    /// reason other than insufficient credits.
    pub async fn execute<F, Fut, T>(
        &self,
        start: Option<ResolutionTier>,
        mut operation: F,
    ) -> Result<T, GenError>
    where
        F: FnMut(ResolutionTier) -> Fut,
        Fut: Future<Output = Result<T, GenError>>,
    {
        let plan = self.plan(start);

        for (index, tier) in plan.iter().copied().enumerate() {
            tracing::debug!(tier = %tier, attempt = index + 1, "Running generation attempt");

            let error = match operation(tier).await {
                Ok(result) => return Ok(result),
                Err(error) => error,
            };

            if !error.is_insufficient_credits() {
                return Err(error);
            }

            match plan.get(index + 1) {
                Some(next) => {
                    tracing::warn!(
                        tier = %tier,
                        next_tier = %next,
                        error = %error,
                        "Insufficient credits, retrying at a lower resolution tier"
                    );
                }
                None => {
                    tracing::warn!(tier = %tier, "Insufficient credits at the lowest resolution tier");
                    return Err(GenError::credits_exhausted(&error));
                }
            }
        }

        Err(GenError::GenerationFailed(
            "no resolution tier produced a result".to_string(),
        ))
    }
}
